//! Configuration errors
//!
//! All configuration errors are reported as `EVL_CONFIG` and stop the
//! process before any store is contacted.

use thiserror::Error;

use crate::pipeline::PipelineError;

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid config JSON: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Unknown connection '{0}'")]
    UnknownConnection(String),

    #[error("Connection '{conn_id}' is {found}, expected {expected}")]
    WrongConnectionKind {
        conn_id: String,
        expected: &'static str,
        found: &'static str,
    },

    #[error("Environment variable '{0}' is not set")]
    MissingEnv(String),
}

impl ConfigError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        ConfigError::Invalid(msg.into())
    }

    pub fn code(&self) -> &'static str {
        "EVL_CONFIG"
    }
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e.to_string())
    }
}
