//! Source selector
//!
//! Resolution rules:
//! - An explicit key is returned unchanged without touching the store
//! - Latest mode lists the prefix and keeps the object with the greatest
//!   last-modified timestamp, using a strict greater-than fold
//!
//! Exact timestamp ties have no secondary ordering: the first tied entry in
//! listing order wins, so the result depends on the store's listing order.
//! Listing failures propagate unchanged; there are no retries here.

use tracing::debug;

use super::backend::{ObjectMeta, ObjectStore};
use super::errors::{SourceError, SourceResult};
use super::location::{ObjectKey, Selection, SourceLocation};

/// Resolves a `SourceLocation` to a single object key.
pub struct SourceSelector<'a> {
    store: &'a dyn ObjectStore,
}

impl<'a> SourceSelector<'a> {
    /// Creates a selector backed by the given object store.
    pub fn new(store: &'a dyn ObjectStore) -> Self {
        Self { store }
    }

    /// Resolves the object key to load.
    ///
    /// # Errors
    ///
    /// - `SourceError::EmptyPrefix` if latest mode finds no objects
    /// - Any listing error from the store, unchanged
    pub fn resolve(&self, location: &SourceLocation) -> SourceResult<ObjectKey> {
        match location.selection() {
            Selection::Key(key) => Ok(ObjectKey::new(key.clone())),
            Selection::Latest => {
                let objects = self.store.list(location.bucket(), location.prefix())?;
                debug!(
                    bucket = location.bucket(),
                    prefix = location.prefix(),
                    candidates = objects.len(),
                    "listed source prefix"
                );

                latest(&objects)
                    .map(|object| ObjectKey::new(object.key.clone()))
                    .ok_or_else(|| SourceError::EmptyPrefix {
                        bucket: location.bucket().to_string(),
                        prefix: location.prefix().to_string(),
                    })
            }
        }
    }
}

/// Returns the entry with the greatest `last_modified`, first one on ties.
fn latest(objects: &[ObjectMeta]) -> Option<&ObjectMeta> {
    let mut latest: Option<&ObjectMeta> = None;
    for object in objects {
        match latest {
            Some(current) if object.last_modified <= current.last_modified => {}
            _ => latest = Some(object),
        }
    }
    latest
}
