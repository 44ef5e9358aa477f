//! # Source Selection
//!
//! Resolves which single object in an object store a run should load,
//! and provides the object-store backends the pipeline reads from.
//!
//! - `SourceLocation`: bucket + prefix + selection mode
//! - `SourceSelector`: explicit key passthrough or latest-modified lookup
//! - `ObjectStore`: the read-only listing/fetch seam
//! - Backends: local filesystem, in-memory, Amazon S3

mod backend;
mod errors;
mod local;
mod location;
mod memory;
mod s3;
mod selector;

pub use backend::{ObjectMeta, ObjectStore};
pub use errors::{SourceError, SourceResult};
pub use local::LocalBackend;
pub use location::{ObjectKey, Selection, SourceLocation};
pub use memory::MemoryObjectStore;
pub use s3::{S3ObjectStore, S3Settings};
pub use selector::SourceSelector;
