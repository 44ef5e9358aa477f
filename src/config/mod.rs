//! Loader configuration
//!
//! A JSON file describing named connections, the source location and the
//! target table. Loaded once, validated once, then turned into a `LoadJob`.

mod connections;
mod errors;

pub use connections::{ConnectionConfig, PostgresSettings};
pub use errors::{ConfigError, ConfigResult};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::decode::SourceFormat;
use crate::mapping::TargetTable;
use crate::pipeline::LoadJob;
use crate::source::{Selection, SourceLocation};

/// Source section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Object store connection id (default "s3_default")
    #[serde(default = "default_source_conn_id")]
    pub conn_id: String,

    pub bucket: String,

    #[serde(default)]
    pub prefix: String,

    /// Explicit key; mutually exclusive with `get_latest`
    #[serde(default)]
    pub key: Option<String>,

    /// Load the most recently modified object under `prefix`
    #[serde(default)]
    pub get_latest: bool,

    #[serde(default)]
    pub format: SourceFormat,
}

/// Target section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Postgres connection id (default "postgres_default")
    #[serde(default = "default_target_conn_id")]
    pub conn_id: String,

    /// Schema name (default "public")
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Table name (default "raw_load")
    #[serde(default = "default_table")]
    pub table: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            conn_id: default_target_conn_id(),
            schema: default_schema(),
            table: default_table(),
        }
    }
}

fn default_source_conn_id() -> String {
    "s3_default".to_string()
}
fn default_target_conn_id() -> String {
    "postgres_default".to_string()
}
fn default_schema() -> String {
    "public".to_string()
}
fn default_table() -> String {
    "raw_load".to_string()
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub connections: BTreeMap<String, ConnectionConfig>,

    pub source: SourceConfig,

    #[serde(default)]
    pub target: TargetConfig,
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        content.parse()
    }

    /// Validate everything that can be checked without contacting a store
    pub fn validate(&self) -> ConfigResult<()> {
        if self.source.bucket.trim().is_empty() {
            return Err(ConfigError::invalid("source.bucket must not be empty"));
        }

        if self.source.key.is_some() && self.source.get_latest {
            return Err(ConfigError::invalid(
                "source.key and source.get_latest are mutually exclusive",
            ));
        }

        if matches!(&self.source.key, Some(key) if key.is_empty()) {
            return Err(ConfigError::invalid("source.key must not be empty"));
        }

        self.target_table()?;

        let source_conn = self.connection(&self.source.conn_id)?;
        if !source_conn.is_object_store() {
            return Err(ConfigError::WrongConnectionKind {
                conn_id: self.source.conn_id.clone(),
                expected: "an object store",
                found: source_conn.kind(),
            });
        }

        match self.connection(&self.target.conn_id)? {
            ConnectionConfig::Postgres(settings) => settings.validate()?,
            other => {
                return Err(ConfigError::WrongConnectionKind {
                    conn_id: self.target.conn_id.clone(),
                    expected: "postgres",
                    found: other.kind(),
                })
            }
        }

        Ok(())
    }

    pub fn connection(&self, conn_id: &str) -> ConfigResult<&ConnectionConfig> {
        self.connections
            .get(conn_id)
            .ok_or_else(|| ConfigError::UnknownConnection(conn_id.to_string()))
    }

    pub fn source_connection(&self) -> ConfigResult<&ConnectionConfig> {
        self.connection(&self.source.conn_id)
    }

    pub fn target_connection(&self) -> ConfigResult<&ConnectionConfig> {
        self.connection(&self.target.conn_id)
    }

    pub fn target_table(&self) -> ConfigResult<TargetTable> {
        TargetTable::new(self.target.schema.clone(), self.target.table.clone())
            .map_err(|e| ConfigError::invalid(e.to_string()))
    }

    /// Selection from the file, if it names one
    pub fn selection(&self) -> Option<Selection> {
        match (&self.source.key, self.source.get_latest) {
            (Some(key), _) => Some(Selection::Key(key.clone())),
            (None, true) => Some(Selection::Latest),
            (None, false) => None,
        }
    }

    /// Build the job, with `selection` taking precedence over the file
    pub fn job(&self, selection: Option<Selection>) -> ConfigResult<LoadJob> {
        let selection = selection.or_else(|| self.selection()).ok_or_else(|| {
            ConfigError::invalid("no source selected: set source.key or source.get_latest")
        })?;

        let bucket = self.source.bucket.clone();
        let prefix = self.source.prefix.clone();
        let source = match selection {
            Selection::Key(key) if key.is_empty() => {
                return Err(ConfigError::invalid("source key must not be empty"))
            }
            Selection::Key(key) => SourceLocation::explicit(bucket, prefix, key),
            Selection::Latest => SourceLocation::latest(bucket, prefix),
        };

        Ok(LoadJob::evictions(source, self.target_table()?).with_format(self.source.format))
    }
}

impl std::str::FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> ConfigResult<Self> {
        let config: Config =
            serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
