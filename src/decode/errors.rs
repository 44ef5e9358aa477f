//! # Decode Errors

use thiserror::Error;

/// Result type for decode operations
pub type DecodeResult<T> = Result<T, DecodeError>;

/// Decoding failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Payload is not UTF-8
    #[error("Invalid UTF-8 after {valid_up_to} bytes")]
    Encoding { valid_up_to: usize },

    #[error("Malformed document at line {line}, column {column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },

    #[error("Top-level value is {found}, expected an array of records")]
    NotASequence { found: &'static str },

    #[error("Record {position} is {found}, expected an object")]
    NotARecord { position: usize, found: &'static str },

    #[error("Record {position} field '{field}' is {found}, expected a scalar")]
    NestedValue {
        position: usize,
        field: String,
        found: &'static str,
    },
}

impl DecodeError {
    /// Error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            DecodeError::Encoding { .. } => "EVL_ENCODING",
            _ => "EVL_FORMAT",
        }
    }

    pub fn is_encoding(&self) -> bool {
        matches!(self, DecodeError::Encoding { .. })
    }
}
