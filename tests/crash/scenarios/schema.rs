//! Schema create/drop crash scenarios

use peanuts::crash_point::points;
use peanuts::FieldType;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::crash::{reopen, run_crashing, run_ok, run_peanuts};

/// An interrupted create leaves no schema behind and can simply be retried.
fn assert_create_rolled_back(crash_point: &str) {
    let temp = TempDir::new().unwrap();

    run_crashing(
        temp.path(),
        crash_point,
        &["create-schema", "user", "name", "STRING", "age", "INTEGER"],
    );

    assert!(!temp.path().join("shop").join("user").exists());
    let db = reopen(temp.path());
    assert!(db.schema_names().is_empty());
    assert_eq!(db.unreadable_schemas().count(), 0);

    let data = run_ok(
        temp.path(),
        &["create-schema", "user", "name", "STRING", "age", "INTEGER"],
    );
    assert_eq!(data["data"]["schema"], "user");
    assert!(!temp.path().join("shop").join(".user.creating").exists());

    // Types are enforced on the recreated schema
    let result = run_peanuts(temp.path(), None, &["insert", "user", "u1", "age=\"thirty\""]);
    assert!(result.crashed);
    let response: Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(response["code"], "PEANUTS_TYPE_CONFLICT");

    let db = reopen(temp.path());
    assert_eq!(
        db.schema("user").unwrap().field_type("age"),
        Some(FieldType::Integer)
    );
}

#[test]
fn test_crash_before_manifest_rename() {
    assert_create_rolled_back(points::MANIFEST_BEFORE_RENAME);
}

#[test]
fn test_crash_before_schema_publish() {
    assert_create_rolled_back(points::SCHEMA_BEFORE_PUBLISH);
}

#[test]
fn test_crash_before_schema_delete() {
    let temp = TempDir::new().unwrap();
    run_ok(temp.path(), &["create-schema", "user", "name", "STRING"]);
    run_ok(temp.path(), &["insert", "user", "u1", "name=Ann"]);

    run_crashing(
        temp.path(),
        points::SCHEMA_DIR_BEFORE_DELETE,
        &["drop-schema", "user"],
    );

    let mut db = reopen(temp.path());
    assert_eq!(
        db.schema("user").unwrap().field_type("name"),
        Some(FieldType::String)
    );
    assert_eq!(
        Value::from(db.read("user", "u1").unwrap()),
        json!({"name": "Ann"})
    );

    // The drop can simply be repeated
    run_ok(temp.path(), &["drop-schema", "user"]);
    assert!(!temp.path().join("shop").join("user").exists());
}

#[test]
fn test_error_response_and_exit_code() {
    let temp = TempDir::new().unwrap();

    let result = run_peanuts(temp.path(), None, &["select", "ghost", "u1"]);
    assert!(result.crashed);
    assert_eq!(result.exit_status.and_then(|s| s.code()), Some(1));

    let response: Value = serde_json::from_str(result.stdout.trim()).unwrap();
    assert_eq!(response["status"], "error");
    assert_eq!(response["code"], "PEANUTS_SCHEMA_NOT_FOUND");
}
