//! Relational store seam

use crate::mapping::{InsertStatement, TargetRow};

use super::errors::LoadResult;

/// A destination that can open transactions.
///
/// A store is one connection. Runs never share one; `begin` takes
/// `&mut self` so a transaction holds the connection exclusively.
pub trait RelationalStore {
    fn begin(&mut self) -> LoadResult<Box<dyn LoadTransaction + '_>>;
}

/// An open transaction.
///
/// Dropping a transaction without calling `commit` must leave no rows
/// behind.
pub trait LoadTransaction {
    /// Executes `statement` once per row, in slice order.
    ///
    /// Returns the number of rows the store reports as inserted.
    fn execute_batch(&mut self, statement: &InsertStatement, rows: &[TargetRow]) -> LoadResult<u64>;

    fn commit(self: Box<Self>) -> LoadResult<()>;

    fn rollback(self: Box<Self>) -> LoadResult<()>;
}
