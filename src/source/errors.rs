//! # Source Errors

use thiserror::Error;

/// Result type for source operations
pub type SourceResult<T> = Result<T, SourceError>;

/// Object-store and source selection errors
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("Bucket not found: {0}")]
    BucketNotFound(String),

    #[error("Object not found: {bucket}/{key}")]
    ObjectNotFound { bucket: String, key: String },

    /// Latest mode found nothing to choose from
    #[error("No objects under prefix '{prefix}' in bucket '{bucket}'")]
    EmptyPrefix { bucket: String, prefix: String },

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("I/O error: {0}")]
    IoError(String),

    /// Remote store rejected or failed a request
    #[error("Request failed: {0}")]
    Request(String),
}

impl SourceError {
    /// Whether this error means the requested object does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SourceError::BucketNotFound(_)
                | SourceError::ObjectNotFound { .. }
                | SourceError::EmptyPrefix { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        assert!(SourceError::EmptyPrefix {
            bucket: "raw".into(),
            prefix: "evictions/".into()
        }
        .is_not_found());
        assert!(SourceError::BucketNotFound("raw".into()).is_not_found());
        assert!(!SourceError::IoError("disk".into()).is_not_found());
        assert!(!SourceError::Request("timeout".into()).is_not_found());
    }
}
