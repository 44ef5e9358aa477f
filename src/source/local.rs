//! # Local Filesystem Backend
//!
//! Buckets are directories under a root; keys are `/`-separated paths
//! relative to the bucket directory. A file's modification time stands in
//! for the object's last-modified timestamp.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use chrono::{DateTime, Utc};

use super::backend::{ObjectMeta, ObjectStore};
use super::errors::{SourceError, SourceResult};

/// Local filesystem object store
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a new local backend
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn bucket_path(&self, bucket: &str) -> SourceResult<PathBuf> {
        let path = self.root.join(checked_relative(bucket)?);
        if !path.is_dir() {
            return Err(SourceError::BucketNotFound(bucket.to_string()));
        }
        Ok(path)
    }

    fn walk(dir: &Path, key_prefix: &str, out: &mut Vec<ObjectMeta>) -> SourceResult<()> {
        let entries = fs::read_dir(dir).map_err(|e| SourceError::IoError(e.to_string()))?;

        for entry in entries {
            let entry = entry.map_err(|e| SourceError::IoError(e.to_string()))?;
            let Some(name) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            let key = if key_prefix.is_empty() {
                name
            } else {
                format!("{}/{}", key_prefix, name)
            };

            let metadata = entry
                .metadata()
                .map_err(|e| SourceError::IoError(e.to_string()))?;
            if metadata.is_dir() {
                Self::walk(&entry.path(), &key, out)?;
            } else if metadata.is_file() {
                let modified = metadata
                    .modified()
                    .map_err(|e| SourceError::IoError(e.to_string()))?;
                out.push(ObjectMeta {
                    key,
                    last_modified: DateTime::<Utc>::from(modified),
                    size: metadata.len(),
                });
            }
        }

        Ok(())
    }
}

/// Rejects keys that would escape the bucket directory
fn checked_relative(key: &str) -> SourceResult<&Path> {
    let path = Path::new(key);
    let escapes = path
        .components()
        .any(|c| !matches!(c, Component::Normal(_)));
    if key.is_empty() || escapes {
        return Err(SourceError::InvalidKey(key.to_string()));
    }
    Ok(path)
}

impl ObjectStore for LocalBackend {
    fn list(&self, bucket: &str, prefix: &str) -> SourceResult<Vec<ObjectMeta>> {
        let bucket_path = self.bucket_path(bucket)?;
        let mut objects = Vec::new();
        Self::walk(&bucket_path, "", &mut objects)?;

        // Prefixes are plain string prefixes, as in S3, not directory names.
        objects.retain(|object| object.key.starts_with(prefix));
        objects.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(objects)
    }

    fn get(&self, bucket: &str, key: &str) -> SourceResult<Vec<u8>> {
        let full_path = self.bucket_path(bucket)?.join(checked_relative(key)?);

        fs::read(&full_path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                SourceError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                SourceError::IoError(e.to_string())
            }
        })
    }
}
