//! Pipeline error taxonomy
//!
//! Every failure of a run is exactly one of these kinds. Subsystem errors
//! convert with `From` so the runner can use `?` throughout.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::load::LoadError;
use crate::mapping::MapError;
use crate::source::SourceError;

/// Result type for pipeline runs
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Failure of one run
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Nothing to load at the requested location
    #[error("{0}")]
    NotFound(SourceError),

    /// Object store failed (listing or read)
    #[error("Object store error: {0}")]
    Source(SourceError),

    #[error("Source object is not valid UTF-8: {0}")]
    Encoding(DecodeError),

    #[error("Source object is not a sequence of flat records: {0}")]
    Format(DecodeError),

    #[error("{0}")]
    MissingField(MapError),

    /// Destination rejected the batch; nothing was written
    #[error("Load failed: {0}")]
    Load(LoadError),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Error code for reporting
    pub fn code(&self) -> &'static str {
        match self {
            PipelineError::NotFound(_) => "EVL_NOT_FOUND",
            PipelineError::Source(_) => "EVL_SOURCE",
            PipelineError::Encoding(_) => "EVL_ENCODING",
            PipelineError::Format(_) => "EVL_FORMAT",
            PipelineError::MissingField(_) => "EVL_MISSING_FIELD",
            PipelineError::Load(_) => "EVL_LOAD",
            PipelineError::Config(_) => "EVL_CONFIG",
        }
    }
}

impl From<SourceError> for PipelineError {
    fn from(e: SourceError) -> Self {
        if e.is_not_found() {
            PipelineError::NotFound(e)
        } else {
            PipelineError::Source(e)
        }
    }
}

impl From<DecodeError> for PipelineError {
    fn from(e: DecodeError) -> Self {
        if e.is_encoding() {
            PipelineError::Encoding(e)
        } else {
            PipelineError::Format(e)
        }
    }
}

impl From<MapError> for PipelineError {
    fn from(e: MapError) -> Self {
        match e {
            MapError::MissingField { .. } => PipelineError::MissingField(e),
            MapError::InvalidIdentifier { .. } | MapError::IdentifierPattern(_) => {
                PipelineError::Config(e.to_string())
            }
        }
    }
}

impl From<LoadError> for PipelineError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Mapping(inner) => inner.into(),
            other => PipelineError::Load(other),
        }
    }
}
