//! CLI command implementations
//!
//! `run` is one scheduled invocation: it opens its own object-store client
//! and its own Postgres connection, loads once, prints the report and
//! exits. Nothing is shared between invocations.

use std::path::Path;

use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::mapping::{InsertStatement, TargetTable, EVICTION_COLUMNS};
use crate::observability::{self, Event};
use crate::pipeline::{self, RunContext};

use super::args::{selection_override, Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Parse arguments, install logging and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    observability::init(cli.log_format).map_err(CliError::logging)?;
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Run {
            config,
            key,
            latest,
            dry_run,
        } => load(&config, selection_override(key, latest), dry_run),
        Command::CheckConfig { config } => check_config(&config),
        Command::Columns { schema, table } => columns(schema, table),
    }
}

fn load_config(path: &Path) -> CliResult<Config> {
    let config = Config::load(path)?;
    info!(
        event = Event::ConfigLoaded.as_str(),
        path = %path.display(),
        source_conn = %config.source.conn_id,
        target_conn = %config.target.conn_id,
        "configuration loaded"
    );
    Ok(config)
}

/// Execute one pipeline run and print its report
pub fn load(
    config_path: &Path,
    selection: Option<crate::source::Selection>,
    dry_run: bool,
) -> CliResult<()> {
    let config = load_config(config_path)?;
    let job = config.job(selection)?;
    let ctx = RunContext::new();

    let objects = config
        .source_connection()?
        .open_object_store(&config.source.conn_id)?;

    let report = if dry_run {
        pipeline::dry_run(&ctx, &job, objects.as_ref())?
    } else {
        let mut store = config
            .target_connection()?
            .connect_postgres(&config.target.conn_id)?;
        pipeline::run(&ctx, &job, objects.as_ref(), &mut store)?
    };

    write_json(&report)
}

/// Validate a configuration file and print the job it resolves to
pub fn check_config(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    write_json(&check_report(&config)?)
}

/// Summary of a loaded configuration.
///
/// A file without a source selection is reported invalid, with the
/// reason in `job_error`; `run` then needs `--key` or `--latest`.
pub fn check_report(config: &Config) -> CliResult<Value> {
    let (job, job_error) = match config.job(None) {
        Ok(job) => (Some(job), None),
        Err(e) => (None, Some(e.to_string())),
    };

    Ok(json!({
        "valid": job_error.is_none(),
        "source": {
            "conn_id": config.source.conn_id,
            "kind": config.source_connection()?.kind(),
        },
        "target": {
            "conn_id": config.target.conn_id,
            "kind": config.target_connection()?.kind(),
            "table": config.target_table()?.to_string(),
        },
        "job": job,
        "job_error": job_error,
    }))
}

/// Print the fixed column list and the insert statement for a table
pub fn columns(schema: String, table: String) -> CliResult<()> {
    let target =
        TargetTable::new(schema, table).map_err(|e| CliError::invalid_argument(e.to_string()))?;
    let statement = InsertStatement::new(&target, &EVICTION_COLUMNS);

    write_json(&json!({
        "table": target.to_string(),
        "columns": EVICTION_COLUMNS.columns(),
        "sql": statement.sql(),
    }))
}
