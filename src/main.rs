//! evictions-loader CLI entry point
//!
//! All logic is delegated to the CLI module. Errors are printed as
//! `CODE: message` on stderr and the process exits with status 1.

use evictions_loader::cli;

fn main() {
    if let Err(e) = cli::run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
