//! Pipeline runner
//!
//! Stages run strictly in order: select -> fetch + decode -> map + load.
//! No stage looks at a later stage's output.

use tracing::{error, info, info_span, warn};

use crate::decode::{RawRecord, RecordDecoder};
use crate::load::{self, RelationalStore};
use crate::observability::Event;
use crate::source::{ObjectKey, ObjectStore, SourceSelector};

use super::context::RunContext;
use super::errors::PipelineResult;
use super::job::{checksum, LoadJob, LoadReport};

/// Runs the pipeline once and loads the selected object.
///
/// `store` is this run's own connection; it is borrowed exclusively for
/// the whole run.
///
/// # Errors
///
/// One `PipelineError` per failed run. When the failure happens after the
/// transaction opened, it was rolled back and the table is unchanged.
pub fn run(
    ctx: &RunContext,
    job: &LoadJob,
    objects: &dyn ObjectStore,
    store: &mut dyn RelationalStore,
) -> PipelineResult<LoadReport> {
    let span = info_span!("run", run_id = %ctx.run_id, attempt = ctx.attempt);
    let _guard = span.enter();

    let result = fetch(ctx, job, objects).and_then(|fetched| {
        let rows = match load::load(store, &fetched.records, job.columns, &job.target) {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    event = Event::LoadAborted.as_str(),
                    target = %job.target,
                    error = %e,
                    "load aborted, nothing written"
                );
                return Err(e.into());
            }
        };
        info!(
            event = Event::LoadCommitted.as_str(),
            target = %job.target,
            rows,
            "load committed"
        );
        Ok(report(ctx, job, &fetched, rows, false))
    });

    finish(result)
}

/// Selects, decodes and maps without touching the destination.
///
/// The report's `rows` is the number of rows a real run would load.
pub fn dry_run(ctx: &RunContext, job: &LoadJob, objects: &dyn ObjectStore) -> PipelineResult<LoadReport> {
    let span = info_span!("dry_run", run_id = %ctx.run_id, attempt = ctx.attempt);
    let _guard = span.enter();

    let result = fetch(ctx, job, objects).and_then(|fetched| {
        for record in &fetched.records {
            job.columns.project(record)?;
        }
        let rows = fetched.records.len() as u64;
        info!(
            event = Event::DryRunComplete.as_str(),
            target = %job.target,
            rows,
            "dry run mapped every record"
        );
        Ok(report(ctx, job, &fetched, rows, true))
    });

    finish(result)
}

struct Fetched {
    key: ObjectKey,
    size: u64,
    sha256: String,
    records: Vec<RawRecord>,
}

fn fetch(ctx: &RunContext, job: &LoadJob, objects: &dyn ObjectStore) -> PipelineResult<Fetched> {
    let location = &job.source;
    info!(
        event = Event::RunStart.as_str(),
        bucket = location.bucket(),
        prefix = location.prefix(),
        latest = location.is_latest(),
        logical_date = ?ctx.logical_date,
        "run started"
    );

    let key = SourceSelector::new(objects).resolve(location)?;
    info!(
        event = Event::SourceResolved.as_str(),
        bucket = location.bucket(),
        key = %key,
        "source resolved"
    );

    let bytes = objects.get(location.bucket(), key.as_str())?;
    let sha256 = checksum(&bytes);
    info!(
        event = Event::SourceFetched.as_str(),
        key = %key,
        size = bytes.len(),
        sha256 = %sha256,
        "source fetched"
    );

    let records = RecordDecoder::new(job.format).decode(&bytes)?;
    info!(
        event = Event::RecordsDecoded.as_str(),
        key = %key,
        records = records.len(),
        "records decoded"
    );

    Ok(Fetched {
        key,
        size: bytes.len() as u64,
        sha256,
        records,
    })
}

fn report(ctx: &RunContext, job: &LoadJob, fetched: &Fetched, rows: u64, dry_run: bool) -> LoadReport {
    LoadReport {
        run_id: ctx.run_id,
        attempt: ctx.attempt,
        bucket: job.source.bucket().to_string(),
        key: fetched.key.to_string(),
        object_size: fetched.size,
        sha256: fetched.sha256.clone(),
        target: job.target.to_string(),
        rows,
        dry_run,
        started_at: ctx.started_at(),
        elapsed_ms: ctx.elapsed_ms(),
    }
}

fn finish(result: PipelineResult<LoadReport>) -> PipelineResult<LoadReport> {
    match &result {
        Ok(report) => info!(
            event = Event::RunComplete.as_str(),
            rows = report.rows,
            elapsed_ms = report.elapsed_ms as u64,
            "run complete"
        ),
        Err(e) => error!(
            event = Event::RunFailed.as_str(),
            code = e.code(),
            error = %e,
            "run failed"
        ),
    }
    result
}
