//! Pipeline entry point
//!
//! One run = select one object, decode it, load it in one transaction.
//! The scheduler that invokes a run owns retries, timeouts and alerting;
//! a run either reports the number of rows loaded or fails with one error.

mod context;
mod errors;
mod job;
mod runner;

pub use context::RunContext;
pub use errors::{PipelineError, PipelineResult};
pub use job::{LoadJob, LoadReport};
pub use runner::{dry_run, run};
