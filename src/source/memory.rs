//! # In-Memory Object Store

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use super::backend::{ObjectMeta, ObjectStore};
use super::errors::{SourceError, SourceResult};

#[derive(Debug, Clone)]
struct StoredObject {
    meta: ObjectMeta,
    data: Vec<u8>,
}

/// Object store held in memory.
///
/// Listings come back in insertion order, which makes it possible to
/// exercise selection independently of key order.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    buckets: RwLock<HashMap<String, Vec<StoredObject>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty bucket (no-op if it exists)
    pub fn create_bucket(&self, bucket: &str) -> SourceResult<()> {
        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| SourceError::IoError("Lock poisoned".into()))?;
        buckets.entry(bucket.to_string()).or_default();
        Ok(())
    }

    /// Store an object, replacing any object with the same key
    pub fn put(
        &self,
        bucket: &str,
        key: &str,
        data: impl Into<Vec<u8>>,
        last_modified: DateTime<Utc>,
    ) -> SourceResult<()> {
        let mut buckets = self
            .buckets
            .write()
            .map_err(|_| SourceError::IoError("Lock poisoned".into()))?;

        let data = data.into();
        let object = StoredObject {
            meta: ObjectMeta {
                key: key.to_string(),
                last_modified,
                size: data.len() as u64,
            },
            data,
        };

        let objects = buckets.entry(bucket.to_string()).or_default();
        match objects.iter_mut().find(|o| o.meta.key == key) {
            Some(existing) => *existing = object,
            None => objects.push(object),
        }
        Ok(())
    }
}

impl ObjectStore for MemoryObjectStore {
    fn list(&self, bucket: &str, prefix: &str) -> SourceResult<Vec<ObjectMeta>> {
        let buckets = self
            .buckets
            .read()
            .map_err(|_| SourceError::IoError("Lock poisoned".into()))?;

        let objects = buckets
            .get(bucket)
            .ok_or_else(|| SourceError::BucketNotFound(bucket.to_string()))?;

        Ok(objects
            .iter()
            .filter(|o| o.meta.key.starts_with(prefix))
            .map(|o| o.meta.clone())
            .collect())
    }

    fn get(&self, bucket: &str, key: &str) -> SourceResult<Vec<u8>> {
        let buckets = self
            .buckets
            .read()
            .map_err(|_| SourceError::IoError("Lock poisoned".into()))?;

        buckets
            .get(bucket)
            .ok_or_else(|| SourceError::BucketNotFound(bucket.to_string()))?
            .iter()
            .find(|o| o.meta.key == key)
            .map(|o| o.data.clone())
            .ok_or_else(|| SourceError::ObjectNotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }
}
