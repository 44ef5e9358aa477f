//! CLI module for the evictions loader
//!
//! Provides command-line interface for:
//! - run: load one source object (or dry-run it)
//! - check-config: validate a configuration file
//! - columns: show the target columns and insert statement

mod args;
mod commands;
mod errors;
mod io;

pub use args::{selection_override, Cli, Command};
pub use commands::{check_config, check_report, columns, load, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_json;
