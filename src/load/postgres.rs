//! # PostgreSQL Store
//!
//! One `postgres::Client` per store, one transaction per run. The insert is
//! prepared once and executed once per row inside the transaction.
//!
//! Parameters are sent in text format and the server casts them to each
//! column's declared type, so the store does not need to know the table's
//! column types.

use std::error::Error;
use std::fmt;

use bytes::{BufMut, BytesMut};
use postgres::{Client, NoTls, Transaction};
use postgres_types::{to_sql_checked, Format, IsNull, ToSql, Type};

use crate::decode::Scalar;
use crate::mapping::{InsertStatement, TargetRow};

use super::errors::{LoadError, LoadResult};
use super::store::{LoadTransaction, RelationalStore};

/// A scalar bound as a text-format parameter
#[derive(Debug)]
pub struct TextParam<'a>(pub &'a Scalar);

impl ToSql for TextParam<'_> {
    fn to_sql(&self, _ty: &Type, out: &mut BytesMut) -> Result<IsNull, Box<dyn Error + Sync + Send>> {
        match self.0.as_text() {
            Some(text) => {
                out.put_slice(text.as_bytes());
                Ok(IsNull::No)
            }
            None => Ok(IsNull::Yes),
        }
    }

    fn accepts(_ty: &Type) -> bool {
        true
    }

    fn encode_format(&self, _ty: &Type) -> Format {
        Format::Text
    }

    to_sql_checked!();
}

/// PostgreSQL destination
pub struct PostgresStore {
    client: Client,
}

impl PostgresStore {
    /// Opens a new connection. The URL is never logged.
    pub fn connect(url: &str) -> LoadResult<Self> {
        let client = Client::connect(url, NoTls).map_err(|e| LoadError::Connect(e.to_string()))?;
        Ok(Self { client })
    }
}

impl fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresStore")
            .field("closed", &self.client.is_closed())
            .finish()
    }
}

impl RelationalStore for PostgresStore {
    fn begin(&mut self) -> LoadResult<Box<dyn LoadTransaction + '_>> {
        let tx = self
            .client
            .transaction()
            .map_err(|e| LoadError::Begin(e.to_string()))?;
        Ok(Box::new(PostgresTransaction { tx }))
    }
}

struct PostgresTransaction<'a> {
    tx: Transaction<'a>,
}

impl LoadTransaction for PostgresTransaction<'_> {
    fn execute_batch(&mut self, statement: &InsertStatement, rows: &[TargetRow]) -> LoadResult<u64> {
        let table = statement.table().to_string();
        let prepared = self
            .tx
            .prepare(statement.sql())
            .map_err(|e| LoadError::execute(&table, None, e.to_string()))?;

        let mut inserted = 0;
        for (index, row) in rows.iter().enumerate() {
            let params: Vec<TextParam<'_>> = row.values().iter().map(TextParam).collect();
            let refs: Vec<&(dyn ToSql + Sync)> = params
                .iter()
                .map(|p| p as &(dyn ToSql + Sync))
                .collect();

            inserted += self
                .tx
                .execute(&prepared, &refs)
                .map_err(|e| LoadError::execute(&table, Some(index), e.to_string()))?;
        }

        Ok(inserted)
    }

    fn commit(self: Box<Self>) -> LoadResult<()> {
        self.tx.commit().map_err(|e| LoadError::Commit(e.to_string()))
    }

    fn rollback(self: Box<Self>) -> LoadResult<()> {
        self.tx
            .rollback()
            .map_err(|e| LoadError::Rollback(e.to_string()))
    }
}
