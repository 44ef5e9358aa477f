//! Transactional bulk load
//!
//! Maps records to rows and inserts them into the target table as one
//! all-or-nothing unit of work.
//!
//! State machine per run:
//! `Idle -> Open -> Mapping -> Executing -> Committed | RolledBack`
//!
//! Any failure after the transaction is opened rolls it back before the
//! error is returned. Nothing here retries.

mod errors;
mod loader;
mod memory;
mod postgres;
mod store;

pub use errors::{LoadError, LoadResult};
pub use loader::{load, LoadState, Loader};
pub use memory::{MemoryDatabase, StoredRow, TableDef};
pub use self::postgres::{PostgresStore, TextParam};
pub use store::{LoadTransaction, RelationalStore};
