//! Schema mapping
//!
//! Projects decoded records onto the fixed target column list and generates
//! the parameterized insert statement for it.
//!
//! # Design Principles
//!
//! - One ordered `ColumnSpec` drives both the statement's column list and
//!   its placeholders, so the two orders cannot drift apart
//! - Field presence is an explicit lookup, never a falsy-value check
//! - Missing required fields fail the whole batch
//! - Missing optional fields become SQL NULL, never a domain default

mod column;
mod errors;
mod row;
mod statement;

pub use column::{ColumnDef, ColumnSpec, EVICTION_COLUMNS};
pub use errors::{MapError, MapResult, RecordRef};
pub use row::TargetRow;
pub use statement::{InsertStatement, TargetTable};
