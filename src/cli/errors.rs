//! CLI-specific error types
//!
//! Every error ends the process with exit status 1 and is printed as
//! `CODE: message` on stderr.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::pipeline::PipelineError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// A pipeline run failed; carries the pipeline's own code
    Run(&'static str),
    /// Configuration file error
    ConfigError,
    /// Invalid command line input
    InvalidArgument,
    /// Log subscriber could not be installed
    LoggingError,
    /// I/O error (stdout)
    IoError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::Run(code) => *code,
            Self::ConfigError => "EVL_CONFIG",
            Self::InvalidArgument => "EVL_CLI_INVALID_ARGUMENT",
            Self::LoggingError => "EVL_CLI_LOGGING",
            Self::IoError => "EVL_CLI_IO",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArgument, msg)
    }

    pub fn logging(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::LoggingError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<PipelineError> for CliError {
    fn from(e: PipelineError) -> Self {
        Self::new(CliErrorCode::Run(e.code()), e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SourceError;

    #[test]
    fn test_pipeline_code_passthrough() {
        let err: CliError = PipelineError::from(SourceError::EmptyPrefix {
            bucket: "raw".into(),
            prefix: "evictions/".into(),
        })
        .into();
        assert_eq!(err.code_str(), "EVL_NOT_FOUND");
        assert!(err.to_string().starts_with("EVL_NOT_FOUND: "));
    }

    #[test]
    fn test_config_code() {
        let err: CliError = ConfigError::UnknownConnection("nope".into()).into();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert_eq!(err.message(), "Unknown connection 'nope'");
    }
}
