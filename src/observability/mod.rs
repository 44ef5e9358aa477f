//! Observability for the loader
//!
//! Structured logging through `tracing`. Library code only emits events;
//! the binary installs the subscriber.

mod events;
mod logger;

pub use events::Event;
pub use logger::{init, LogFormat, LOG_ENV};
