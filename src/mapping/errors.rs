//! # Mapping Errors

use std::fmt;

use thiserror::Error;

/// Result type for mapping operations
pub type MapResult<T> = Result<T, MapError>;

/// Identifies a record in error messages
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    /// Zero-based position in the source document
    pub position: usize,
    /// Upstream `:id`, when present
    pub source_id: Option<String>,
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source_id {
            Some(id) => write!(f, "record {} (:id {})", self.position, id),
            None => write!(f, "record {}", self.position),
        }
    }
}

/// Mapping failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("{record} is missing required field '{field}'")]
    MissingField { record: RecordRef, field: String },

    #[error("Invalid {kind} identifier: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Identifier pattern failed to compile: {0}")]
    IdentifierPattern(String),
}

impl MapError {
    pub fn code(&self) -> &'static str {
        match self {
            MapError::MissingField { .. } => "EVL_MISSING_FIELD",
            MapError::InvalidIdentifier { .. } | MapError::IdentifierPattern(_) => "EVL_CONFIG",
        }
    }
}
