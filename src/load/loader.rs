//! Schema mapper and loader

use std::fmt;

use tracing::{debug, warn};

use crate::decode::RawRecord;
use crate::mapping::{ColumnSpec, InsertStatement, TargetRow, TargetTable};

use super::errors::{LoadError, LoadResult};
use super::store::{LoadTransaction, RelationalStore};

/// Where a load currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No transaction yet
    Idle,
    Open,
    Mapping,
    Executing,
    Committed,
    RolledBack,
}

impl LoadState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadState::Idle => "IDLE",
            LoadState::Open => "OPEN",
            LoadState::Mapping => "MAPPING",
            LoadState::Executing => "EXECUTING",
            LoadState::Committed => "COMMITTED",
            LoadState::RolledBack => "ROLLED_BACK",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadState::Committed | LoadState::RolledBack)
    }

    fn can_transition_to(&self, next: LoadState) -> bool {
        use LoadState::*;
        matches!(
            (self, next),
            (Idle, Open)
                | (Open, Mapping)
                | (Open, RolledBack)
                | (Mapping, Executing)
                | (Mapping, RolledBack)
                | (Executing, Committed)
                | (Executing, RolledBack)
        )
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Loads one batch of records into one table.
///
/// A loader is finished once a `load` call has opened a transaction.
pub struct Loader<'a> {
    store: &'a mut dyn RelationalStore,
    spec: &'a ColumnSpec,
    statement: InsertStatement,
    state: LoadState,
}

impl<'a> Loader<'a> {
    pub fn new(store: &'a mut dyn RelationalStore, spec: &'a ColumnSpec, target: &TargetTable) -> Self {
        Self {
            store,
            spec,
            statement: InsertStatement::new(target, spec),
            state: LoadState::Idle,
        }
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn statement(&self) -> &InsertStatement {
        &self.statement
    }

    /// Maps every record and inserts the rows in one transaction.
    ///
    /// Returns the number of rows loaded, which equals `records.len()`.
    ///
    /// # Errors
    ///
    /// - `LoadError::Mapping` if a record lacks a required field
    /// - `LoadError::Execute` if the store rejects the batch
    /// - `LoadError::Begin` / `LoadError::Commit` for transaction failures
    ///
    /// On every error after the transaction opens, it has been rolled back.
    pub fn load(&mut self, records: &[RawRecord]) -> LoadResult<u64> {
        if self.state.is_terminal() {
            return Err(LoadError::Begin(format!(
                "loader already finished (state {})",
                self.state
            )));
        }

        let statement = self.statement.clone();
        let spec = self.spec;

        let tx = self.store.begin()?;
        Self::advance(&mut self.state, LoadState::Open);

        Self::advance(&mut self.state, LoadState::Mapping);
        let rows = match records
            .iter()
            .map(|record| spec.project(record))
            .collect::<Result<Vec<TargetRow>, _>>()
        {
            Ok(rows) => rows,
            Err(e) => return Err(Self::abort(&mut self.state, tx, e.into())),
        };

        Self::advance(&mut self.state, LoadState::Executing);
        Self::execute(&mut self.state, tx, &statement, &rows)?;

        Ok(records.len() as u64)
    }

    fn execute(
        state: &mut LoadState,
        mut tx: Box<dyn LoadTransaction + '_>,
        statement: &InsertStatement,
        rows: &[TargetRow],
    ) -> LoadResult<()> {
        if !rows.is_empty() {
            match tx.execute_batch(statement, rows) {
                Ok(affected) => debug!(
                    table = %statement.table(),
                    rows = rows.len(),
                    affected,
                    "batch executed"
                ),
                Err(e) => return Err(Self::abort(state, tx, e)),
            }
        }

        match tx.commit() {
            Ok(()) => {
                Self::advance(state, LoadState::Committed);
                Ok(())
            }
            Err(e) => {
                // A failed commit leaves nothing behind.
                Self::advance(state, LoadState::RolledBack);
                Err(e)
            }
        }
    }

    /// Rolls back and hands back the error that caused it
    fn abort(state: &mut LoadState, tx: Box<dyn LoadTransaction + '_>, cause: LoadError) -> LoadError {
        if let Err(rollback) = tx.rollback() {
            warn!(error = %rollback, cause = %cause, "rollback failed after load error");
        }
        Self::advance(state, LoadState::RolledBack);
        cause
    }

    fn advance(state: &mut LoadState, next: LoadState) {
        debug_assert!(
            state.can_transition_to(next),
            "illegal load transition {} -> {}",
            state,
            next
        );
        debug!(from = %state, to = %next, "load state");
        *state = next;
    }
}

/// Loads `records` into `target` through `store` as a single transaction.
pub fn load(
    store: &mut dyn RelationalStore,
    records: &[RawRecord],
    spec: &ColumnSpec,
    target: &TargetTable,
) -> LoadResult<u64> {
    Loader::new(store, spec, target).load(records)
}
