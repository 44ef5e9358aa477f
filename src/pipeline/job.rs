//! Load job and run report

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::decode::SourceFormat;
use crate::mapping::{ColumnSpec, TargetTable, EVICTION_COLUMNS};
use crate::source::SourceLocation;

/// Everything a run needs to know about what to load and where.
///
/// Built once from configuration; schema and table are plain values
/// resolved at construction.
#[derive(Debug, Clone, Serialize)]
pub struct LoadJob {
    pub source: SourceLocation,
    pub format: SourceFormat,
    pub target: TargetTable,
    pub columns: &'static ColumnSpec,
}

impl LoadJob {
    /// Job loading eviction notices with the fixed eviction columns
    pub fn evictions(source: SourceLocation, target: TargetTable) -> Self {
        Self {
            source,
            format: SourceFormat::Json,
            target,
            columns: &EVICTION_COLUMNS,
        }
    }

    pub fn with_format(mut self, format: SourceFormat) -> Self {
        self.format = format;
        self
    }
}

/// Outcome of a successful run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub run_id: Uuid,
    pub attempt: u32,
    pub bucket: String,
    pub key: String,
    pub object_size: u64,
    /// SHA-256 of the object bytes, lowercase hex
    pub sha256: String,
    pub target: String,
    /// Rows committed, or rows that would be loaded for a dry run
    pub rows: u64,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u128,
}

/// Lowercase hex SHA-256 of `data`
pub(crate) fn checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum() {
        assert_eq!(
            checksum(b"[]"),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn test_evictions_job() {
        let job = LoadJob::evictions(
            SourceLocation::latest("raw", "evictions/"),
            TargetTable::new("public", "raw_load").unwrap(),
        )
        .with_format(SourceFormat::Jsonl);
        assert_eq!(job.columns.len(), 28);
        assert_eq!(job.format, SourceFormat::Jsonl);
    }
}
