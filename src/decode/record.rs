//! Raw record types

use std::collections::BTreeMap;

use serde_json::{Map, Number, Value};

/// Metadata field carrying the upstream row identifier, when exported
pub const SOURCE_ID_FIELD: &str = ":id";

/// A scalar value decoded from a source record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scalar {
    Null,
    Bool(bool),
    /// Kept in textual form, exactly as written in the source
    Number(String),
    String(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Text form used when binding the value as a statement parameter.
    ///
    /// `None` means SQL NULL.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(true) => Some("true"),
            Scalar::Bool(false) => Some("false"),
            Scalar::Number(n) => Some(n),
            Scalar::String(s) => Some(s),
        }
    }

    /// Converts a JSON value, returning `None` for arrays and objects
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Null => Some(Scalar::Null),
            Value::Bool(b) => Some(Scalar::Bool(*b)),
            Value::Number(n) => Some(Scalar::Number(n.to_string())),
            Value::String(s) => Some(Scalar::String(s.clone())),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Number(n) => n
                .parse::<Number>()
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(n.clone())),
            Scalar::String(s) => Value::String(s.clone()),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_string())
    }
}

/// Result of looking a field up in a record.
///
/// Presence is explicit: an empty string, zero, or JSON `null` that is
/// actually in the record is `Present`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldLookup<'a> {
    Present(&'a Scalar),
    Absent,
}

/// One decoded record: field name to scalar value
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    position: usize,
    fields: BTreeMap<String, Scalar>,
}

impl RawRecord {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Scalar) {
        self.fields.insert(name.into(), value);
    }

    /// Zero-based position of the record in its source document
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn lookup(&self, field: &str) -> FieldLookup<'_> {
        match self.fields.get(field) {
            Some(value) => FieldLookup::Present(value),
            None => FieldLookup::Absent,
        }
    }

    /// Upstream identifier (`:id`), when the record carries a non-null one
    pub fn source_id(&self) -> Option<&str> {
        match self.lookup(SOURCE_ID_FIELD) {
            FieldLookup::Present(value) => value.as_text(),
            FieldLookup::Absent => None,
        }
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .fields
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_is_tagged() {
        let record = RawRecord::new(0)
            .with_field("eviction_id", "M1".into())
            .with_field("address", Scalar::String(String::new()))
            .with_field("zip", Scalar::Number("0".into()))
            .with_field("city", Scalar::Null);

        assert_eq!(
            record.lookup("address"),
            FieldLookup::Present(&Scalar::String(String::new()))
        );
        assert_eq!(record.lookup("zip"), FieldLookup::Present(&Scalar::Number("0".into())));
        assert_eq!(record.lookup("city"), FieldLookup::Present(&Scalar::Null));
        assert_eq!(record.lookup("state"), FieldLookup::Absent);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(Scalar::Null.as_text(), None);
        assert_eq!(Scalar::Bool(true).as_text(), Some("true"));
        assert_eq!(Scalar::Number("94110".into()).as_text(), Some("94110"));
        assert_eq!(Scalar::from("SF").as_text(), Some("SF"));
    }

    #[test]
    fn test_scalar_from_json_rejects_nested() {
        assert_eq!(Scalar::from_json(&json!(null)), Some(Scalar::Null));
        assert_eq!(Scalar::from_json(&json!(12.5)), Some(Scalar::Number("12.5".into())));
        assert_eq!(Scalar::from_json(&json!([1])), None);
        assert_eq!(Scalar::from_json(&json!({"a": 1})), None);
    }

    #[test]
    fn test_source_id() {
        let record = RawRecord::new(3).with_field(SOURCE_ID_FIELD, "row-abc".into());
        assert_eq!(record.source_id(), Some("row-abc"));
        assert_eq!(RawRecord::new(0).source_id(), None);
    }
}
