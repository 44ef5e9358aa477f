//! # Load Errors

use thiserror::Error;

use crate::mapping::MapError;

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;

/// Load failures
#[derive(Debug, Clone, Error)]
pub enum LoadError {
    /// A record could not be mapped to a row
    #[error(transparent)]
    Mapping(#[from] MapError),

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Could not open transaction: {0}")]
    Begin(String),

    /// The store rejected the batch
    #[error("Batch rejected by {table}{}: {message}", at_row(.row))]
    Execute {
        table: String,
        row: Option<usize>,
        message: String,
    },

    #[error("Commit failed: {0}")]
    Commit(String),

    #[error("Rollback failed: {0}")]
    Rollback(String),
}

fn at_row(row: &Option<usize>) -> String {
    row.map(|r| format!(" at row {}", r)).unwrap_or_default()
}

impl LoadError {
    /// Error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::Mapping(e) => e.code(),
            _ => "EVL_LOAD",
        }
    }

    pub fn execute(table: impl Into<String>, row: Option<usize>, message: impl Into<String>) -> Self {
        LoadError::Execute {
            table: table.into(),
            row,
            message: message.into(),
        }
    }
}
