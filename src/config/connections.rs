//! Named connections
//!
//! A connection id in the source or target section names one entry of the
//! `connections` table. Secrets can stay out of the file: a Postgres
//! connection may name an environment variable holding its URL.

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::load::PostgresStore;
use crate::pipeline::PipelineResult;
use crate::source::{LocalBackend, ObjectStore, S3ObjectStore, S3Settings};

use super::errors::{ConfigError, ConfigResult};

/// Postgres connection settings; exactly one of `url` and `url_env`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresSettings {
    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub url_env: Option<String>,
}

impl PostgresSettings {
    pub fn validate(&self) -> ConfigResult<()> {
        match (&self.url, &self.url_env) {
            (Some(_), Some(_)) => Err(ConfigError::invalid(
                "postgres connection sets both 'url' and 'url_env'",
            )),
            (None, None) => Err(ConfigError::invalid(
                "postgres connection needs 'url' or 'url_env'",
            )),
            _ => Ok(()),
        }
    }

    /// The connection URL, read from the environment if configured so
    pub fn resolve_url(&self) -> ConfigResult<String> {
        self.validate()?;
        match (&self.url, &self.url_env) {
            (Some(url), _) => Ok(url.clone()),
            (_, Some(var)) => env::var(var).map_err(|_| ConfigError::MissingEnv(var.clone())),
            (None, None) => Err(ConfigError::invalid("postgres connection has no url")),
        }
    }
}

/// One entry of the `connections` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConnectionConfig {
    S3(S3Settings),
    Local { root: PathBuf },
    Postgres(PostgresSettings),
}

impl ConnectionConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectionConfig::S3(_) => "s3",
            ConnectionConfig::Local { .. } => "local",
            ConnectionConfig::Postgres(_) => "postgres",
        }
    }

    pub fn is_object_store(&self) -> bool {
        matches!(self, ConnectionConfig::S3(_) | ConnectionConfig::Local { .. })
    }

    /// Open the object store this connection describes
    pub fn open_object_store(&self, conn_id: &str) -> PipelineResult<Box<dyn ObjectStore>> {
        match self {
            ConnectionConfig::S3(settings) => Ok(Box::new(S3ObjectStore::connect(settings)?)),
            ConnectionConfig::Local { root } => Ok(Box::new(LocalBackend::new(root.clone()))),
            ConnectionConfig::Postgres(_) => Err(ConfigError::WrongConnectionKind {
                conn_id: conn_id.to_string(),
                expected: "an object store",
                found: self.kind(),
            }
            .into()),
        }
    }

    /// Open a fresh Postgres connection for one run
    pub fn connect_postgres(&self, conn_id: &str) -> PipelineResult<PostgresStore> {
        match self {
            ConnectionConfig::Postgres(settings) => {
                let url = settings.resolve_url()?;
                Ok(PostgresStore::connect(&url)?)
            }
            _ => Err(ConfigError::WrongConnectionKind {
                conn_id: conn_id.to_string(),
                expected: "postgres",
                found: self.kind(),
            }
            .into()),
        }
    }
}
