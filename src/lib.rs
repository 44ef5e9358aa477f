//! evictions-loader - batch loader for eviction notices
//!
//! One run selects a single source object in an object store, decodes it
//! into flat records, and loads them into a Postgres table inside one
//! transaction.
//!
//! - `source`: object selection and object-store backends
//! - `decode`: bytes to ordered `RawRecord`s
//! - `mapping`: fixed column projection and insert statement
//! - `load`: transactional bulk load
//! - `pipeline`: one run, end to end

pub mod cli;
pub mod config;
pub mod decode;
pub mod load;
pub mod mapping;
pub mod observability;
pub mod pipeline;
pub mod source;
