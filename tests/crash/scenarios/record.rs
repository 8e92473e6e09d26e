//! Record overwrite crash scenarios
//!
//! An interrupted overwrite must leave either the old record or the new one,
//! never a partial file.

use peanuts::crash_point::points;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::crash::{reopen, run_crashing, run_ok, temp_files};

fn setup() -> TempDir {
    let temp = TempDir::new().unwrap();
    run_ok(temp.path(), &["create-schema", "user", "name", "STRING", "age", "INTEGER"]);
    run_ok(temp.path(), &["insert", "user", "u1", "name=Ann", "age=30"]);
    temp
}

#[test]
fn test_crash_before_rename_keeps_old_record() {
    let temp = setup();

    run_crashing(
        temp.path(),
        points::RECORD_BEFORE_RENAME,
        &["insert", "user", "u1", "name=Ann", "age=31"],
    );

    // The temp file is left behind but never visible as a record
    assert_eq!(temp_files(temp.path(), "user").len(), 1);

    let mut db = reopen(temp.path());
    assert_eq!(
        Value::from(db.read("user", "u1").unwrap()),
        json!({"name": "Ann", "age": 30})
    );

    let report = db.load_cache("user", None).unwrap();
    assert_eq!(report.loaded, vec!["u1"]);
    assert!(report.is_complete());
}

#[test]
fn test_crash_before_rename_of_new_record() {
    let temp = setup();

    run_crashing(
        temp.path(),
        points::RECORD_BEFORE_RENAME,
        &["insert", "user", "u2", "name=Bea"],
    );

    let mut db = reopen(temp.path());
    assert!(db.read("user", "u2").unwrap_err().is_not_found());
}

#[test]
fn test_crash_after_rename_keeps_new_record() {
    let temp = setup();

    run_crashing(
        temp.path(),
        points::RECORD_AFTER_RENAME,
        &["insert", "user", "u1", "name=Ann", "age=31"],
    );

    assert!(temp_files(temp.path(), "user").is_empty());
    let mut db = reopen(temp.path());
    assert_eq!(
        Value::from(db.read("user", "u1").unwrap()),
        json!({"name": "Ann", "age": 31})
    );
}

#[test]
fn test_write_after_crash_recovers_slot() {
    let temp = setup();

    run_crashing(
        temp.path(),
        points::RECORD_BEFORE_RENAME,
        &["insert", "user", "u1", "age=31"],
    );
    run_ok(temp.path(), &["insert", "user", "u1", "age=32"]);

    assert!(temp_files(temp.path(), "user").is_empty());
    let data = run_ok(temp.path(), &["select", "user", "u1"]);
    assert_eq!(data["data"]["record"], json!({"age": 32}));
}
