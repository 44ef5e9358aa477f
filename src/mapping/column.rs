//! Column specification
//!
//! The eviction table layout is fixed configuration, constant across runs.
//! `raw_id`, `created_at` and `updated_at` are filled in by the target
//! store and never come from a record.

use serde::Serialize;

use crate::decode::{FieldLookup, RawRecord, Scalar};

use super::errors::{MapError, MapResult, RecordRef};
use super::row::TargetRow;

/// One target column and the record field it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub column: &'static str,
    pub field: &'static str,
    pub required: bool,
}

impl ColumnDef {
    /// Required column read from the field of the same name
    pub const fn required(name: &'static str) -> Self {
        Self {
            column: name,
            field: name,
            required: true,
        }
    }

    /// Optional column read from the field of the same name
    pub const fn optional(name: &'static str) -> Self {
        Self {
            column: name,
            field: name,
            required: false,
        }
    }
}

/// Ordered projection from record fields to target columns.
///
/// The order is significant: it is the statement's column order and the
/// order of every row's values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ColumnSpec {
    columns: &'static [ColumnDef],
}

impl ColumnSpec {
    pub const fn new(columns: &'static [ColumnDef]) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &'static [ColumnDef] {
        self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|c| c.column)
    }

    /// Builds the target row for `record`, walking columns in order.
    ///
    /// # Errors
    ///
    /// `MapError::MissingField` for the first required field the record
    /// does not contain.
    pub fn project(&self, record: &RawRecord) -> MapResult<TargetRow> {
        let mut values = Vec::with_capacity(self.columns.len());

        for def in self.columns {
            let value = match record.lookup(def.field) {
                FieldLookup::Present(value) => value.clone(),
                FieldLookup::Absent if def.required => {
                    return Err(MapError::MissingField {
                        record: RecordRef {
                            position: record.position(),
                            source_id: record.source_id().map(str::to_string),
                        },
                        field: def.field.to_string(),
                    });
                }
                FieldLookup::Absent => Scalar::Null,
            };
            values.push(value);
        }

        Ok(TargetRow::new(values))
    }
}

/// Eviction notice columns, in load order
pub static EVICTION_COLUMNS: ColumnSpec = ColumnSpec::new(&[
    ColumnDef::required("eviction_id"),
    ColumnDef::optional("address"),
    ColumnDef::optional("city"),
    ColumnDef::optional("state"),
    ColumnDef::optional("zip"),
    ColumnDef::optional("file_date"),
    ColumnDef::optional("non_payment"),
    ColumnDef::optional("breach"),
    ColumnDef::optional("nuisance"),
    ColumnDef::optional("illegal_use"),
    ColumnDef::optional("failure_to_sign_renewal"),
    ColumnDef::optional("access_denial"),
    ColumnDef::optional("unapproved_subtenant"),
    ColumnDef::optional("owner_move_in"),
    ColumnDef::optional("demolition"),
    ColumnDef::optional("capital_improvement"),
    ColumnDef::optional("substantial_rehab"),
    ColumnDef::optional("ellis_act_withdrawal"),
    ColumnDef::optional("condo_conversion"),
    ColumnDef::optional("roommate_same_unit"),
    ColumnDef::optional("other_cause"),
    ColumnDef::optional("late_payments"),
    ColumnDef::optional("lead_remediation"),
    ColumnDef::optional("development"),
    ColumnDef::optional("good_samaritan_ends"),
    ColumnDef::optional("constraints_date"),
    ColumnDef::optional("supervisor_district"),
    ColumnDef::optional("neighborhood"),
]);

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_eviction_columns_layout() {
        assert_eq!(EVICTION_COLUMNS.len(), 28);
        assert_eq!(EVICTION_COLUMNS.columns()[0], ColumnDef::required("eviction_id"));
        assert_eq!(EVICTION_COLUMNS.column_names().last(), Some("neighborhood"));

        let required: Vec<_> = EVICTION_COLUMNS
            .columns()
            .iter()
            .filter(|c| c.required)
            .map(|c| c.column)
            .collect();
        assert_eq!(required, vec!["eviction_id"]);
    }

    #[test]
    fn test_eviction_columns_unique_and_record_sourced() {
        let names: HashSet<_> = EVICTION_COLUMNS.column_names().collect();
        assert_eq!(names.len(), EVICTION_COLUMNS.len());
        for generated in ["raw_id", "created_at", "updated_at"] {
            assert!(!names.contains(generated));
        }
    }

    #[test]
    fn test_project_only_required() {
        let record = RawRecord::new(0).with_field("eviction_id", "M162268".into());
        let row = EVICTION_COLUMNS.project(&record).unwrap();

        assert_eq!(row.len(), EVICTION_COLUMNS.len());
        assert_eq!(row.values()[0], Scalar::from("M162268"));
        assert!(row.values()[1..].iter().all(Scalar::is_null));
    }

    #[test]
    fn test_project_keeps_falsy_values() {
        let record = RawRecord::new(0)
            .with_field("eviction_id", "M1".into())
            .with_field("address", Scalar::String(String::new()))
            .with_field("supervisor_district", Scalar::Number("0".into()))
            .with_field("breach", Scalar::Bool(false));
        let row = EVICTION_COLUMNS.project(&record).unwrap();

        assert_eq!(row.values()[1], Scalar::String(String::new()));
        assert_eq!(row.values()[7], Scalar::Bool(false));
        assert_eq!(row.values()[26], Scalar::Number("0".into()));
    }

    #[test]
    fn test_project_missing_required() {
        let record = RawRecord::new(4)
            .with_field(":id", "row-9".into())
            .with_field("address", "1 Main St".into());
        let err = EVICTION_COLUMNS.project(&record).unwrap_err();

        assert_eq!(
            err,
            MapError::MissingField {
                record: RecordRef {
                    position: 4,
                    source_id: Some("row-9".into())
                },
                field: "eviction_id".into()
            }
        );
    }

    #[test]
    fn test_project_required_null_is_present() {
        let record = RawRecord::new(0).with_field("eviction_id", Scalar::Null);
        let row = EVICTION_COLUMNS.project(&record).unwrap();
        assert!(row.values()[0].is_null());
    }

    #[test]
    fn test_project_renamed_field() {
        static SPEC: ColumnSpec = ColumnSpec::new(&[
            ColumnDef {
                column: "notice_id",
                field: "eviction_id",
                required: true,
            },
            ColumnDef::optional("city"),
        ]);
        let record = RawRecord::new(0)
            .with_field("eviction_id", "M5".into())
            .with_field("city", "San Francisco".into());
        let row = SPEC.project(&record).unwrap();
        assert_eq!(row.values(), &[Scalar::from("M5"), Scalar::from("San Francisco")]);
    }
}
