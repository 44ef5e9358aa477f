//! Insert statement generation

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use super::column::ColumnSpec;
use super::errors::{MapError, MapResult};

/// Plain SQL identifier: letter or underscore first, at most 63 bytes
fn identifier_pattern() -> MapResult<&'static Regex> {
    static PATTERN: OnceLock<Result<Regex, regex::Error>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$"))
        .as_ref()
        .map_err(|e| MapError::IdentifierPattern(e.to_string()))
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Schema-qualified target table.
///
/// Both parts are plain SQL identifiers, checked once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetTable {
    schema: String,
    table: String,
}

impl TargetTable {
    pub fn new(schema: impl Into<String>, table: impl Into<String>) -> MapResult<Self> {
        let schema = schema.into();
        let table = table.into();

        let pattern = identifier_pattern()?;
        for (kind, value) in [("schema", &schema), ("table", &table)] {
            if !pattern.is_match(value) {
                return Err(MapError::InvalidIdentifier {
                    kind,
                    value: value.clone(),
                });
            }
        }

        Ok(Self { schema, table })
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Quoted `"schema"."table"` form
    pub fn qualified(&self) -> String {
        format!("{}.{}", quote_ident(&self.schema), quote_ident(&self.table))
    }
}

impl fmt::Display for TargetTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.table)
    }
}

/// Parameterized insert for one `ColumnSpec` into one table.
///
/// Column names and `$n` placeholders are produced in the same pass over
/// the spec, so placeholder `n` always binds the `n`th column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    table: TargetTable,
    columns: Vec<&'static str>,
    sql: String,
}

impl InsertStatement {
    pub fn new(table: &TargetTable, spec: &ColumnSpec) -> Self {
        let (quoted, placeholders): (Vec<String>, Vec<String>) = spec
            .column_names()
            .enumerate()
            .map(|(i, name)| (quote_ident(name), format!("${}", i + 1)))
            .unzip();

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table.qualified(),
            quoted.join(", "),
            placeholders.join(", ")
        );

        Self {
            table: table.clone(),
            columns: spec.column_names().collect(),
            sql,
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn table(&self) -> &TargetTable {
        &self.table
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Number of parameters each row must bind
    pub fn arity(&self) -> usize {
        self.columns.len()
    }
}

impl fmt::Display for InsertStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ColumnDef, EVICTION_COLUMNS};

    #[test]
    fn test_target_table_validation() {
        let table = TargetTable::new("public", "raw_load").unwrap();
        assert_eq!(table.qualified(), "\"public\".\"raw_load\"");
        assert_eq!(table.to_string(), "public.raw_load");

        assert!(matches!(
            TargetTable::new("public; DROP TABLE x", "raw_load"),
            Err(MapError::InvalidIdentifier { kind: "schema", .. })
        ));
        assert!(matches!(
            TargetTable::new("public", ""),
            Err(MapError::InvalidIdentifier { kind: "table", .. })
        ));
        assert!(TargetTable::new("public", "1abc").is_err());
    }

    #[test]
    fn test_identifier_pattern() {
        let pattern = identifier_pattern().unwrap();
        assert!(pattern.is_match("_raw_load2"));
        assert!(pattern.is_match(&"a".repeat(63)));
        assert!(!pattern.is_match(&"a".repeat(64)));
        assert!(!pattern.is_match("raw-load"));

        assert!(TargetTable::new("public", "a".repeat(64)).is_err());
    }

    #[test]
    fn test_small_statement() {
        static SPEC: ColumnSpec = ColumnSpec::new(&[
            ColumnDef::required("eviction_id"),
            ColumnDef::optional("address"),
            ColumnDef::optional("city"),
        ]);
        let table = TargetTable::new("staging", "evictions").unwrap();
        let statement = InsertStatement::new(&table, &SPEC);

        assert_eq!(
            statement.sql(),
            "INSERT INTO \"staging\".\"evictions\" (\"eviction_id\", \"address\", \"city\") VALUES ($1, $2, $3)"
        );
        assert_eq!(statement.arity(), 3);
    }

    #[test]
    fn test_eviction_statement_alignment() {
        let table = TargetTable::new("public", "raw_load").unwrap();
        let statement = InsertStatement::new(&table, &EVICTION_COLUMNS);

        assert_eq!(statement.arity(), 28);
        assert!(statement.sql().contains("\"eviction_id\""));
        assert!(statement.sql().ends_with("$27, $28)"));
        assert!(!statement.sql().contains("raw_id"));
        assert_eq!(
            statement.columns(),
            EVICTION_COLUMNS.column_names().collect::<Vec<_>>().as_slice()
        );
    }
}
