//! CLI argument definitions using clap
//!
//! Commands:
//! - evictions-loader run --config <path> [--key <key> | --latest] [--dry-run]
//! - evictions-loader check-config --config <path>
//! - evictions-loader columns [--schema <schema>] [--table <table>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::observability::LogFormat;
use crate::source::Selection;

/// Loads eviction notices from an object store into Postgres
#[derive(Parser, Debug)]
#[command(name = "evictions-loader")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load one source object into the target table
    Run {
        /// Path to configuration file
        #[arg(long, default_value = "./evictions-loader.json")]
        config: PathBuf,

        /// Load this key instead of the configured selection
        #[arg(long, conflicts_with = "latest")]
        key: Option<String>,

        /// Load the most recently modified object under the prefix
        #[arg(long)]
        latest: bool,

        /// Select, decode and map without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate a configuration file and print the resolved job
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./evictions-loader.json")]
        config: PathBuf,
    },

    /// Print the target columns and the generated INSERT statement
    Columns {
        #[arg(long, default_value = "public")]
        schema: String,

        #[arg(long, default_value = "raw_load")]
        table: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

/// Selection override from `--key` / `--latest`
pub fn selection_override(key: Option<String>, latest: bool) -> Option<Selection> {
    match (key, latest) {
        (Some(key), _) => Some(Selection::Key(key)),
        (None, true) => Some(Selection::Latest),
        (None, false) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run() {
        let cli = Cli::try_parse_from([
            "evictions-loader",
            "run",
            "--config",
            "loader.json",
            "--latest",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        match cli.command {
            Command::Run { config, key, latest, dry_run } => {
                assert_eq!(config, PathBuf::from("loader.json"));
                assert_eq!(key, None);
                assert!(latest);
                assert!(dry_run);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_key_conflicts_with_latest() {
        let result = Cli::try_parse_from([
            "evictions-loader",
            "run",
            "--key",
            "evictions/a.json",
            "--latest",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_global_log_format() {
        let cli = Cli::try_parse_from(["evictions-loader", "columns", "--log-format", "text"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Text);
    }

    #[test]
    fn test_selection_override() {
        assert_eq!(selection_override(None, false), None);
        assert_eq!(selection_override(None, true), Some(Selection::Latest));
        assert_eq!(
            selection_override(Some("a.json".into()), false),
            Some(Selection::Key("a.json".into()))
        );
    }
}
