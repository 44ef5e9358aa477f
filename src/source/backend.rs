//! # Object Store Trait

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::SourceResult;

/// One entry of a prefix listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub key: String,
    pub last_modified: DateTime<Utc>,
    pub size: u64,
}

/// Read-only object store used by the pipeline.
///
/// Implementations perform blocking calls; the pipeline never issues two
/// requests at once.
pub trait ObjectStore: Send + Sync + std::fmt::Debug {
    /// List every object in `bucket` whose key starts with `prefix`
    fn list(&self, bucket: &str, prefix: &str) -> SourceResult<Vec<ObjectMeta>>;

    /// Read the full content of one object
    fn get(&self, bucket: &str, key: &str) -> SourceResult<Vec<u8>>;
}
