//! # In-Memory Relational Store
//!
//! A small transactional table store used for dry runs and tests. It
//! enforces NOT NULL and UNIQUE constraints, fills in the system columns
//! (`raw_id`, `created_at`, `updated_at`) on commit, and keeps counters of
//! every transaction outcome so callers can assert on them.
//!
//! Handles are cheap clones sharing one database.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use crate::decode::Scalar;
use crate::mapping::{InsertStatement, TargetRow, TargetTable};

use super::errors::{LoadError, LoadResult};
use super::store::{LoadTransaction, RelationalStore};

/// Table definition for `MemoryDatabase::create_table`
#[derive(Debug, Clone)]
pub struct TableDef {
    table: TargetTable,
    columns: Vec<String>,
    not_null: HashSet<String>,
    unique: HashSet<String>,
}

impl TableDef {
    pub fn new<I, S>(table: TargetTable, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table,
            columns: columns.into_iter().map(Into::into).collect(),
            not_null: HashSet::new(),
            unique: HashSet::new(),
        }
    }

    pub fn not_null(mut self, column: &str) -> Self {
        self.not_null.insert(column.to_string());
        self
    }

    pub fn unique(mut self, column: &str) -> Self {
        self.unique.insert(column.to_string());
        self
    }
}

/// A committed row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRow {
    pub raw_id: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub values: BTreeMap<String, Scalar>,
}

#[derive(Debug)]
struct MemoryTable {
    def: TableDef,
    rows: Vec<StoredRow>,
}

impl MemoryTable {
    /// Checks `row` against constraints, given rows staged earlier in the
    /// same transaction
    fn check(&self, row: &BTreeMap<String, Scalar>, staged: &[BTreeMap<String, Scalar>]) -> Result<(), String> {
        for column in &self.def.not_null {
            if row.get(column).map_or(true, Scalar::is_null) {
                return Err(format!("null value in column \"{}\" violates not-null constraint", column));
            }
        }

        for column in &self.def.unique {
            let Some(value) = row.get(column).filter(|v| !v.is_null()) else {
                continue;
            };
            let committed = self.rows.iter().map(|r| &r.values);
            let duplicate = committed
                .chain(staged.iter())
                .any(|other| other.get(column) == Some(value));
            if duplicate {
                return Err(format!(
                    "duplicate key value violates unique constraint on \"{}\"",
                    column
                ));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Default)]
struct DatabaseState {
    tables: HashMap<String, MemoryTable>,
    next_raw_id: u64,
    begins: usize,
    commits: usize,
    rollbacks: usize,
    batches: Vec<Vec<TargetRow>>,
    fail_next_execute: Option<String>,
}

/// Shared handle to an in-memory database
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Arc<Mutex<DatabaseState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, DatabaseState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Creates (or replaces) a table
    pub fn create_table(&self, def: TableDef) {
        let key = def.table.to_string();
        self.lock().tables.insert(key, MemoryTable { def, rows: Vec::new() });
    }

    /// Makes the next `execute_batch` fail as if the connection dropped
    pub fn fail_next_execute(&self, message: impl Into<String>) {
        self.lock().fail_next_execute = Some(message.into());
    }

    /// Committed rows of `table`, in insertion order
    pub fn rows(&self, table: &TargetTable) -> Vec<StoredRow> {
        self.lock()
            .tables
            .get(&table.to_string())
            .map(|t| t.rows.clone())
            .unwrap_or_default()
    }

    pub fn row_count(&self, table: &TargetTable) -> usize {
        self.lock()
            .tables
            .get(&table.to_string())
            .map_or(0, |t| t.rows.len())
    }

    pub fn begins(&self) -> usize {
        self.lock().begins
    }

    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Every parameter-group batch passed to `execute_batch`, in call order
    pub fn batches(&self) -> Vec<Vec<TargetRow>> {
        self.lock().batches.clone()
    }
}

impl RelationalStore for MemoryDatabase {
    fn begin(&mut self) -> LoadResult<Box<dyn LoadTransaction + '_>> {
        self.lock().begins += 1;
        Ok(Box::new(MemoryTransaction {
            db: self.clone(),
            staged: Vec::new(),
        }))
    }
}

struct MemoryTransaction {
    db: MemoryDatabase,
    staged: Vec<(String, BTreeMap<String, Scalar>)>,
}

impl LoadTransaction for MemoryTransaction {
    fn execute_batch(&mut self, statement: &InsertStatement, rows: &[TargetRow]) -> LoadResult<u64> {
        let mut state = self.db.lock();
        state.batches.push(rows.to_vec());

        let table_name = statement.table().to_string();
        if let Some(message) = state.fail_next_execute.take() {
            return Err(LoadError::execute(table_name, None, message));
        }

        let table = state.tables.get(&table_name).ok_or_else(|| {
            LoadError::execute(&table_name, None, format!("relation \"{}\" does not exist", table_name))
        })?;

        if let Some(unknown) = statement
            .columns()
            .iter()
            .find(|c| !table.def.columns.iter().any(|d| d == *c))
        {
            return Err(LoadError::execute(
                &table_name,
                None,
                format!("column \"{}\" does not exist", unknown),
            ));
        }

        let mut pending: Vec<BTreeMap<String, Scalar>> = self
            .staged
            .iter()
            .filter(|(name, _)| *name == table_name)
            .map(|(_, values)| values.clone())
            .collect();

        for (index, row) in rows.iter().enumerate() {
            if row.len() != statement.arity() {
                return Err(LoadError::execute(
                    &table_name,
                    Some(index),
                    format!("row binds {} values, statement expects {}", row.len(), statement.arity()),
                ));
            }

            let values: BTreeMap<String, Scalar> = statement
                .columns()
                .iter()
                .zip(row.values())
                .map(|(column, value)| (column.to_string(), value.clone()))
                .collect();

            table
                .check(&values, &pending)
                .map_err(|message| LoadError::execute(&table_name, Some(index), message))?;
            pending.push(values.clone());
            self.staged.push((table_name.clone(), values));
        }

        Ok(rows.len() as u64)
    }

    fn commit(self: Box<Self>) -> LoadResult<()> {
        let MemoryTransaction { db, staged } = *self;
        let mut state = db.lock();
        let now = Utc::now();

        for (table_name, values) in staged {
            state.next_raw_id += 1;
            let raw_id = state.next_raw_id;
            let table = state
                .tables
                .get_mut(&table_name)
                .ok_or_else(|| LoadError::Commit(format!("relation \"{}\" vanished", table_name)))?;
            table.rows.push(StoredRow {
                raw_id,
                created_at: now,
                updated_at: now,
                values,
            });
        }

        state.commits += 1;
        Ok(())
    }

    fn rollback(self: Box<Self>) -> LoadResult<()> {
        self.db.lock().rollbacks += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ColumnDef, ColumnSpec};

    static SPEC: ColumnSpec = ColumnSpec::new(&[
        ColumnDef::required("eviction_id"),
        ColumnDef::optional("city"),
    ]);

    fn table() -> TargetTable {
        TargetTable::new("public", "raw_load").unwrap()
    }

    fn db() -> MemoryDatabase {
        let db = MemoryDatabase::new();
        db.create_table(
            TableDef::new(table(), ["eviction_id", "city"])
                .not_null("eviction_id")
                .unique("eviction_id"),
        );
        db
    }

    fn row(id: &str) -> TargetRow {
        TargetRow::new(vec![Scalar::from(id), Scalar::Null])
    }

    #[test]
    fn test_commit_assigns_system_columns() {
        let mut db = db();
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        tx.execute_batch(&statement, &[row("M1"), row("M2")]).unwrap();
        tx.commit().unwrap();

        let rows = db.rows(&table());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].raw_id, 1);
        assert_eq!(rows[1].raw_id, 2);
        assert_eq!(rows[0].values["eviction_id"], Scalar::from("M1"));
        assert_eq!(rows[0].created_at, rows[0].updated_at);
    }

    #[test]
    fn test_rollback_discards() {
        let mut db = db();
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        tx.execute_batch(&statement, &[row("M1")]).unwrap();
        tx.rollback().unwrap();

        assert_eq!(db.row_count(&table()), 0);
        assert_eq!(db.rollbacks(), 1);
    }

    #[test]
    fn test_drop_without_commit_discards() {
        let mut db = db();
        let statement = InsertStatement::new(&table(), &SPEC);
        {
            let mut tx = db.begin().unwrap();
            tx.execute_batch(&statement, &[row("M1")]).unwrap();
        }
        assert_eq!(db.row_count(&table()), 0);
    }

    #[test]
    fn test_unique_within_batch() {
        let mut db = db();
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        let err = tx
            .execute_batch(&statement, &[row("M1"), row("M1")])
            .unwrap_err();
        assert!(matches!(err, LoadError::Execute { row: Some(1), .. }));
    }

    #[test]
    fn test_not_null() {
        let mut db = db();
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        let err = tx
            .execute_batch(&statement, &[TargetRow::new(vec![Scalar::Null, Scalar::Null])])
            .unwrap_err();
        assert!(err.to_string().contains("not-null"));
    }

    #[test]
    fn test_missing_table() {
        let mut db = MemoryDatabase::new();
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        let err = tx.execute_batch(&statement, &[row("M1")]).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_injected_failure() {
        let mut db = db();
        db.fail_next_execute("connection reset by peer");
        let statement = InsertStatement::new(&table(), &SPEC);

        let mut tx = db.begin().unwrap();
        assert!(tx.execute_batch(&statement, &[row("M1")]).is_err());
        tx.rollback().unwrap();

        let mut tx = db.begin().unwrap();
        tx.execute_batch(&statement, &[row("M1")]).unwrap();
        tx.commit().unwrap();
        assert_eq!(db.row_count(&table()), 1);
    }
}
