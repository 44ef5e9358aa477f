//! Local Backend Tests
//!
//! The filesystem object store against real directories:
//! - Recursive prefix listing with `/`-separated keys
//! - File modification time drives latest selection
//! - Keys cannot escape the bucket directory

use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

use evictions_loader::load::{MemoryDatabase, TableDef};
use evictions_loader::mapping::{TargetTable, EVICTION_COLUMNS};
use evictions_loader::pipeline::{self, LoadJob, RunContext};
use evictions_loader::source::{LocalBackend, ObjectStore, SourceError, SourceLocation};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn write_object(root: &Path, key: &str, body: &str, age_secs: u64) {
    let path = root.join("raw").join(key);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, body).unwrap();

    let modified = SystemTime::now() - Duration::from_secs(age_secs);
    File::options()
        .write(true)
        .open(&path)
        .unwrap()
        .set_modified(modified)
        .unwrap();
}

// =============================================================================
// Listing Tests
// =============================================================================

#[test]
fn test_recursive_prefix_listing() {
    let tmp = TempDir::new().unwrap();
    write_object(tmp.path(), "evictions/2024/01.json", "[]", 10);
    write_object(tmp.path(), "evictions/2024/02.json", "[]", 5);
    write_object(tmp.path(), "other/x.json", "[]", 1);

    let backend = LocalBackend::new(tmp.path().to_path_buf());
    let keys: Vec<_> = backend
        .list("raw", "evictions/")
        .unwrap()
        .into_iter()
        .map(|o| o.key)
        .collect();
    assert_eq!(keys, vec!["evictions/2024/01.json", "evictions/2024/02.json"]);
}

#[test]
fn test_missing_bucket() {
    let tmp = TempDir::new().unwrap();
    let backend = LocalBackend::new(tmp.path().to_path_buf());

    let err = backend.list("raw", "").unwrap_err();
    assert!(matches!(err, SourceError::BucketNotFound(_)));
}

#[test]
fn test_key_cannot_escape_bucket() {
    let tmp = TempDir::new().unwrap();
    write_object(tmp.path(), "evictions/a.json", "[]", 1);
    fs::write(tmp.path().join("secret.txt"), "nope").unwrap();

    let backend = LocalBackend::new(tmp.path().to_path_buf());
    let err = backend.get("raw", "../secret.txt").unwrap_err();
    assert!(matches!(err, SourceError::InvalidKey(_)));
}

// =============================================================================
// End-to-End Tests
// =============================================================================

/// Newest file by mtime is loaded, not the last one by name.
#[test]
fn test_run_loads_newest_file() {
    let tmp = TempDir::new().unwrap();
    write_object(tmp.path(), "evictions/a.json", r#"[{"eviction_id": "OLD"}]"#, 3600);
    write_object(
        tmp.path(),
        "evictions/b.json",
        r#"[{"eviction_id": "NEW1"}, {"eviction_id": "NEW2"}]"#,
        60,
    );
    write_object(tmp.path(), "evictions/c.json", r#"[{"eviction_id": "OLDER"}]"#, 7200);

    let target = TargetTable::new("public", "raw_load").unwrap();
    let mut db = MemoryDatabase::new();
    db.create_table(TableDef::new(target.clone(), EVICTION_COLUMNS.column_names()));

    let backend = LocalBackend::new(tmp.path().to_path_buf());
    let job = LoadJob::evictions(SourceLocation::latest("raw", "evictions/"), target.clone());
    let report = pipeline::run(&RunContext::new(), &job, &backend, &mut db).unwrap();

    assert_eq!(report.key, "evictions/b.json");
    assert_eq!(report.rows, 2);
    assert_eq!(db.row_count(&target), 2);
}
