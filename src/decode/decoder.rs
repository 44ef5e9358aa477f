//! Record decoder implementation

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{DecodeError, DecodeResult};
use super::record::{RawRecord, Scalar};

/// Layout of the source document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// One JSON array of objects
    #[default]
    Json,
    /// One JSON object per line; blank lines are skipped
    Jsonl,
}

/// Decodes source bytes into records in document order.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordDecoder {
    format: SourceFormat,
}

impl RecordDecoder {
    pub fn new(format: SourceFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    /// Decodes `bytes` into a sequence of flat records.
    ///
    /// # Errors
    ///
    /// - `DecodeError::Encoding` if the bytes are not UTF-8
    /// - A format error if the document is malformed, is not a sequence,
    ///   or contains an element that is not a flat object
    pub fn decode(&self, bytes: &[u8]) -> DecodeResult<Vec<RawRecord>> {
        let text = std::str::from_utf8(bytes).map_err(|e| DecodeError::Encoding {
            valid_up_to: e.valid_up_to(),
        })?;

        match self.format {
            SourceFormat::Json => decode_array(text),
            SourceFormat::Jsonl => decode_lines(text),
        }
    }
}

/// Decodes a JSON array document
pub fn decode(bytes: &[u8]) -> DecodeResult<Vec<RawRecord>> {
    RecordDecoder::new(SourceFormat::Json).decode(bytes)
}

fn decode_array(text: &str) -> DecodeResult<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(text).map_err(syntax_error)?;

    let Value::Array(elements) = document else {
        return Err(DecodeError::NotASequence {
            found: json_type_name(&document),
        });
    };

    elements
        .iter()
        .enumerate()
        .map(|(position, element)| to_record(position, element))
        .collect()
}

fn decode_lines(text: &str) -> DecodeResult<Vec<RawRecord>> {
    let mut records = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let element: Value = serde_json::from_str(line).map_err(|e| DecodeError::Syntax {
            line: line_index + 1,
            column: e.column(),
            message: e.to_string(),
        })?;
        records.push(to_record(records.len(), &element)?);
    }

    Ok(records)
}

fn to_record(position: usize, element: &Value) -> DecodeResult<RawRecord> {
    let Value::Object(map) = element else {
        return Err(DecodeError::NotARecord {
            position,
            found: json_type_name(element),
        });
    };

    let mut record = RawRecord::new(position);
    for (field, value) in map {
        let scalar = Scalar::from_json(value).ok_or_else(|| DecodeError::NestedValue {
            position,
            field: field.clone(),
            found: json_type_name(value),
        })?;
        record.insert(field.clone(), scalar);
    }
    Ok(record)
}

fn syntax_error(e: serde_json::Error) -> DecodeError {
    DecodeError::Syntax {
        line: e.line(),
        column: e.column(),
        message: e.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::FieldLookup;

    #[test]
    fn test_decode_array() {
        let bytes = br#"[
            {"eviction_id": "M162268", "zip": 94110, "non_payment": false},
            {"eviction_id": "M162269", "city": null}
        ]"#;
        let records = decode(bytes).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].position(), 0);
        assert_eq!(records[1].position(), 1);
        assert_eq!(
            records[0].lookup("zip"),
            FieldLookup::Present(&Scalar::Number("94110".into()))
        );
        assert_eq!(
            records[0].lookup("non_payment"),
            FieldLookup::Present(&Scalar::Bool(false))
        );
        assert_eq!(records[1].lookup("city"), FieldLookup::Present(&Scalar::Null));
        assert_eq!(records[1].lookup("zip"), FieldLookup::Absent);
    }

    #[test]
    fn test_empty_array() {
        assert!(decode(b"[]").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = decode(&[b'[', 0xff, 0xfe, b']']).unwrap_err();
        assert_eq!(err, DecodeError::Encoding { valid_up_to: 1 });
        assert!(err.is_encoding());
    }

    #[test]
    fn test_syntax_error() {
        let err = decode(b"[{\"eviction_id\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { .. }));
        assert_eq!(err.code(), "EVL_FORMAT");
    }

    #[test]
    fn test_top_level_not_array() {
        let err = decode(br#"{"eviction_id": "M1"}"#).unwrap_err();
        assert_eq!(err, DecodeError::NotASequence { found: "object" });
    }

    #[test]
    fn test_element_not_object() {
        let err = decode(br#"[{"eviction_id": "M1"}, 42]"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NotARecord {
                position: 1,
                found: "number"
            }
        );
    }

    #[test]
    fn test_nested_value_rejected() {
        let err = decode(br#"[{"eviction_id": "M1", "location": {"type": "Point"}}]"#).unwrap_err();
        assert_eq!(
            err,
            DecodeError::NestedValue {
                position: 0,
                field: "location".into(),
                found: "object"
            }
        );
    }

    #[test]
    fn test_numbers_keep_source_text() {
        let bytes = br#"[{
            "eviction_id": "M1",
            "zip": 123456789012345678901234567890,
            "supervisor_district": 1e2,
            "breach": 1.10
        }]"#;
        let records = decode(bytes).unwrap();
        let number = |field: &str| match records[0].lookup(field) {
            FieldLookup::Present(value) => value.as_text().map(str::to_string),
            FieldLookup::Absent => None,
        };

        assert_eq!(number("zip").as_deref(), Some("123456789012345678901234567890"));
        assert_eq!(number("supervisor_district").as_deref(), Some("1e2"));
        assert_eq!(number("breach").as_deref(), Some("1.10"));
    }

    #[test]
    fn test_decode_lines() {
        let bytes = b"{\"eviction_id\": \"M1\"}\n\n{\"eviction_id\": \"M2\"}\n";
        let records = RecordDecoder::new(SourceFormat::Jsonl).decode(bytes).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].position(), 1);
        assert_eq!(
            records[1].lookup("eviction_id"),
            FieldLookup::Present(&Scalar::String("M2".into()))
        );
    }

    #[test]
    fn test_decode_lines_reports_line_number() {
        let bytes = b"{\"eviction_id\": \"M1\"}\n\n{broken\n";
        let err = RecordDecoder::new(SourceFormat::Jsonl).decode(bytes).unwrap_err();
        assert!(matches!(err, DecodeError::Syntax { line: 3, .. }));
    }

    #[test]
    fn test_decode_lines_rejects_non_object() {
        let err = RecordDecoder::new(SourceFormat::Jsonl)
            .decode(b"[1, 2]\n")
            .unwrap_err();
        assert_eq!(
            err,
            DecodeError::NotARecord {
                position: 0,
                found: "array"
            }
        );
    }
}
