//! Run Context
//!
//! Context handed to a run by whatever invokes it. Carries identity and
//! scheduling metadata for logging and the run report.

use std::collections::HashMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

/// Context carried through one pipeline run
#[derive(Debug, Clone)]
pub struct RunContext {
    /// Run ID for tracing
    pub run_id: Uuid,

    /// Attempt number assigned by the scheduler (1-based)
    pub attempt: u32,

    /// Logical date the scheduler runs this for, if any
    pub logical_date: Option<DateTime<Utc>>,

    /// Free-form scheduler metadata
    pub metadata: HashMap<String, Value>,

    started_at: DateTime<Utc>,
    started: Instant,
}

impl RunContext {
    /// Create a context for a first attempt
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            attempt: 1,
            logical_date: None,
            metadata: HashMap::new(),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn with_attempt(mut self, attempt: u32) -> Self {
        self.attempt = attempt;
        self
    }

    pub fn with_logical_date(mut self, logical_date: DateTime<Utc>) -> Self {
        self.logical_date = Some(logical_date);
        self
    }

    /// Add metadata for observability
    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Get elapsed time in milliseconds
    pub fn elapsed_ms(&self) -> u128 {
        self.started.elapsed().as_millis()
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
