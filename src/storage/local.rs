//! # Local Filesystem Backend
//!
//! Layout under the database root:
//!
//! ```text
//! <root>/<schema>/.schema.json   manifest
//! <root>/<schema>/<record id>    JSON object per record
//! ```
//!
//! Record writes go to `.rec.<id>.tmp` in the schema directory, are fsynced,
//! then renamed over the final name. Rename within a directory is atomic on
//! POSIX, so a reader sees either the old record or the new one.
//!
//! A schema is built in `<root>/.<schema>.creating/` (manifest written via
//! `.manifest.tmp`) and the whole directory is renamed into place. Hidden
//! names are never valid identifiers, so staging directories and temp files
//! stay out of schema and record listings.

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};
use super::identifier::{is_valid_identifier, validate_identifier};
use super::record::Record;
use crate::crash_point::{maybe_crash, points};

/// File name of the schema manifest inside each schema directory
pub const MANIFEST_FILE_NAME: &str = ".schema.json";

const MANIFEST_TEMP_NAME: &str = ".manifest.tmp";

fn record_temp_name(id: &str) -> String {
    format!(".rec.{}.tmp", id)
}

fn staging_dir_name(schema: &str) -> String {
    format!(".{}.creating", schema)
}

/// Local filesystem storage backend rooted at one database directory
#[derive(Debug)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Open (creating if missing) the directory for `database` under `data_dir`.
    pub fn open(data_dir: &Path, database: &str) -> StorageResult<Self> {
        validate_identifier("database", database)?;
        let root = data_dir.join(database);

        fs::create_dir_all(&root).map_err(|e| {
            StorageError::io(
                format!("Failed to create database directory {}", root.display()),
                e,
            )
        })?;

        Ok(Self { root })
    }

    /// Returns the database root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn schema_path(&self, schema: &str) -> StorageResult<PathBuf> {
        validate_identifier("schema", schema)?;
        Ok(self.root.join(schema))
    }

    fn record_path(&self, schema: &str, id: &str) -> StorageResult<PathBuf> {
        let dir = self.schema_path(schema)?;
        validate_identifier("record", id)?;
        Ok(dir.join(id))
    }

    /// Write `data` to `dir/name` via `dir/temp_name` + fsync + rename.
    fn write_atomic(
        dir: &Path,
        name: &str,
        temp_name: &str,
        data: &[u8],
        crash_point: &str,
    ) -> StorageResult<()> {
        let final_path = dir.join(name);
        let temp_path = dir.join(temp_name);

        let result = (|| -> StorageResult<()> {
            let mut file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .map_err(|e| {
                    StorageError::io(format!("Failed to create {}", temp_path.display()), e)
                })?;

            file.write_all(data).map_err(|e| {
                StorageError::io(format!("Failed to write {}", temp_path.display()), e)
            })?;

            file.sync_all().map_err(|e| {
                StorageError::io(format!("Failed to fsync {}", temp_path.display()), e)
            })?;

            maybe_crash(crash_point);

            fs::rename(&temp_path, &final_path).map_err(|e| {
                StorageError::io(format!("Failed to commit {}", final_path.display()), e)
            })
        })();

        if result.is_err() {
            let _ = fs::remove_file(&temp_path);
            return result;
        }

        Self::sync_dir(dir);
        Ok(())
    }

    /// Makes renames inside `dir` durable
    fn sync_dir(dir: &Path) {
        if let Ok(dir_handle) = File::open(dir) {
            let _ = dir_handle.sync_all();
        }
    }

    fn remove_dir_if_present(dir: &Path) -> StorageResult<()> {
        match fs::remove_dir_all(dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io(
                format!("Failed to remove directory {}", dir.display()),
                e,
            )),
        }
    }

    /// Lists valid identifiers among directory entries accepted by `keep`.
    fn list_names(dir: &Path, keep: impl Fn(&fs::FileType) -> bool) -> StorageResult<Vec<String>> {
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(StorageError::io(
                    format!("Failed to read directory {}", dir.display()),
                    e,
                ))
            }
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                StorageError::io(format!("Failed to read entry in {}", dir.display()), e)
            })?;
            let file_type = entry.file_type().map_err(|e| {
                StorageError::io(format!("Failed to stat entry in {}", dir.display()), e)
            })?;

            if !keep(&file_type) {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                if is_valid_identifier(name) {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }
}

impl StorageBackend for LocalBackend {
    fn create_schema(&self, schema: &str, manifest: &[u8]) -> StorageResult<()> {
        let dir = self.schema_path(schema)?;
        if dir.exists() {
            return Err(StorageError::IoError(format!(
                "Schema directory {} already exists",
                dir.display()
            )));
        }

        // A previous create that never finished leaves its staging directory
        let staging = self.root.join(staging_dir_name(schema));
        Self::remove_dir_if_present(&staging)?;

        let result = (|| -> StorageResult<()> {
            fs::create_dir(&staging).map_err(|e| {
                StorageError::io(format!("Failed to create {}", staging.display()), e)
            })?;
            Self::write_atomic(
                &staging,
                MANIFEST_FILE_NAME,
                MANIFEST_TEMP_NAME,
                manifest,
                points::MANIFEST_BEFORE_RENAME,
            )?;

            maybe_crash(points::SCHEMA_BEFORE_PUBLISH);

            fs::rename(&staging, &dir).map_err(|e| {
                StorageError::io(format!("Failed to publish schema directory {}", dir.display()), e)
            })
        })();

        if result.is_err() {
            let _ = fs::remove_dir_all(&staging);
            return result;
        }

        Self::sync_dir(&self.root);
        Ok(())
    }

    fn delete_schema_dir(&self, schema: &str) -> StorageResult<()> {
        let dir = self.schema_path(schema)?;
        maybe_crash(points::SCHEMA_DIR_BEFORE_DELETE);
        Self::remove_dir_if_present(&dir)
    }

    fn list_schemas(&self) -> StorageResult<Vec<String>> {
        Self::list_names(&self.root, |t| t.is_dir())
    }

    fn persist(&self, schema: &str, id: &str, record: &Record) -> StorageResult<()> {
        let path = self.record_path(schema, id)?;
        let dir = path.parent().unwrap_or(&self.root);
        let data = record.to_bytes()?;

        Self::write_atomic(dir, id, &record_temp_name(id), &data, points::RECORD_BEFORE_RENAME)?;
        maybe_crash(points::RECORD_AFTER_RENAME);
        Ok(())
    }

    fn fetch(&self, schema: &str, id: &str) -> StorageResult<Record> {
        let path = self.record_path(schema, id)?;

        let bytes = fs::read(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::RecordNotFound(id.to_string())
            } else {
                StorageError::io(format!("Failed to read {}", path.display()), e)
            }
        })?;

        Record::from_bytes(id, &bytes)
    }

    fn list_records(&self, schema: &str) -> StorageResult<Vec<String>> {
        let dir = self.schema_path(schema)?;
        Self::list_names(&dir, |t| t.is_file())
    }

    fn read_manifest(&self, schema: &str) -> StorageResult<Option<Vec<u8>>> {
        let path = self.schema_path(schema)?.join(MANIFEST_FILE_NAME);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::io(
                format!("Failed to read manifest {}", path.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, LocalBackend) {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path(), "testdb").unwrap();
        backend.create_schema("users", b"{\"name\":\"users\"}").unwrap();
        (temp, backend)
    }

    fn sample_record() -> Record {
        let mut record = Record::new();
        record.insert("name", json!("Ann"));
        record.insert("age", json!(30));
        record
    }

    #[test]
    fn test_persist_fetch() {
        let (_temp, backend) = setup();

        backend.persist("users", "u1", &sample_record()).unwrap();
        let fetched = backend.fetch("users", "u1").unwrap();
        assert_eq!(fetched, sample_record());
    }

    #[test]
    fn test_layout_is_one_file_per_record() {
        let (temp, backend) = setup();

        backend.persist("users", "u1", &sample_record()).unwrap();

        let path = temp.path().join("testdb").join("users").join("u1");
        let on_disk: serde_json::Value =
            serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(on_disk, json!({"name": "Ann", "age": 30}));
    }

    #[test]
    fn test_persist_overwrites() {
        let (_temp, backend) = setup();

        backend.persist("users", "u1", &sample_record()).unwrap();
        let mut updated = Record::new();
        updated.insert("name", json!("Bea"));
        backend.persist("users", "u1", &updated).unwrap();

        assert_eq!(backend.fetch("users", "u1").unwrap(), updated);
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (temp, backend) = setup();

        backend.persist("users", "u1", &sample_record()).unwrap();

        let dir = temp.path().join("testdb").join("users");
        let leftovers: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_failed_persist_keeps_previous_record() {
        let (temp, backend) = setup();
        backend.persist("users", "u1", &sample_record()).unwrap();

        // A directory squatting on the temp name makes the temp open fail.
        let dir = temp.path().join("testdb").join("users");
        fs::create_dir(dir.join(".rec.u1.tmp")).unwrap();

        let mut updated = Record::new();
        updated.insert("name", json!("Bea"));
        assert!(matches!(
            backend.persist("users", "u1", &updated),
            Err(StorageError::IoError(_))
        ));
        assert_eq!(backend.fetch("users", "u1").unwrap(), sample_record());
    }

    #[test]
    fn test_fetch_missing() {
        let (_temp, backend) = setup();

        let result = backend.fetch("users", "ghost");
        assert_eq!(result, Err(StorageError::RecordNotFound("ghost".into())));
    }

    #[test]
    fn test_unsafe_identifiers_rejected() {
        let (_temp, backend) = setup();

        assert!(matches!(
            backend.persist("users", "../escape", &sample_record()),
            Err(StorageError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            backend.fetch("..", "u1"),
            Err(StorageError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            LocalBackend::open(Path::new("/tmp"), "a/b"),
            Err(StorageError::InvalidIdentifier(_))
        ));
    }

    #[test]
    fn test_list_records_skips_manifest() {
        let (_temp, backend) = setup();

        backend.persist("users", "u2", &sample_record()).unwrap();
        backend.persist("users", "u1", &sample_record()).unwrap();

        assert_eq!(backend.list_records("users").unwrap(), vec!["u1", "u2"]);
    }

    #[test]
    fn test_create_schema_writes_manifest() {
        let (temp, backend) = setup();

        assert_eq!(
            backend.read_manifest("users").unwrap(),
            Some(b"{\"name\":\"users\"}".to_vec())
        );
        assert!(temp.path().join("testdb").join("users").join(MANIFEST_FILE_NAME).exists());
        assert!(!temp.path().join("testdb").join(".users.creating").exists());
    }

    #[test]
    fn test_create_existing_schema_fails() {
        let (_temp, backend) = setup();
        backend.persist("users", "u1", &sample_record()).unwrap();

        assert!(matches!(
            backend.create_schema("users", b"{}"),
            Err(StorageError::IoError(_))
        ));
        assert_eq!(backend.fetch("users", "u1").unwrap(), sample_record());
        assert_eq!(
            backend.read_manifest("users").unwrap(),
            Some(b"{\"name\":\"users\"}".to_vec())
        );
    }

    #[test]
    fn test_create_schema_replaces_stale_staging() {
        let temp = TempDir::new().unwrap();
        let backend = LocalBackend::open(temp.path(), "testdb").unwrap();
        let staging = temp.path().join("testdb").join(".orders.creating");
        fs::create_dir(&staging).unwrap();
        fs::write(staging.join(MANIFEST_TEMP_NAME), b"{\"na").unwrap();

        // Unfinished creates are invisible
        assert!(backend.list_schemas().unwrap().is_empty());

        backend.create_schema("orders", b"{}").unwrap();
        assert_eq!(backend.list_schemas().unwrap(), vec!["orders"]);
        assert_eq!(backend.read_manifest("orders").unwrap(), Some(b"{}".to_vec()));
        assert!(!staging.exists());
    }

    #[test]
    fn test_record_temp_names_never_collide_with_manifest() {
        assert_eq!(record_temp_name("u1"), ".rec.u1.tmp");
        for id in ["schema.json", "manifest", "manifest.tmp"] {
            assert_ne!(record_temp_name(id), MANIFEST_TEMP_NAME);
            assert_ne!(record_temp_name(id), MANIFEST_FILE_NAME);
        }
    }

    #[test]
    fn test_record_named_like_manifest() {
        let (temp, backend) = setup();
        let dir = temp.path().join("testdb").join("users");
        // Leftover from an interrupted write of record "schema.json"
        fs::write(dir.join(record_temp_name("schema.json")), b"partial").unwrap();

        backend.persist("users", "schema.json", &sample_record()).unwrap();

        assert_eq!(backend.fetch("users", "schema.json").unwrap(), sample_record());
        assert_eq!(
            backend.read_manifest("users").unwrap(),
            Some(b"{\"name\":\"users\"}".to_vec())
        );
        assert_eq!(backend.list_records("users").unwrap(), vec!["schema.json"]);
    }

    #[test]
    fn test_delete_schema_dir() {
        let (temp, backend) = setup();
        backend.persist("users", "u1", &sample_record()).unwrap();

        backend.delete_schema_dir("users").unwrap();
        assert!(!temp.path().join("testdb").join("users").exists());
        assert!(backend.list_schemas().unwrap().is_empty());

        // Deleting again is not an error
        backend.delete_schema_dir("users").unwrap();
    }

    #[test]
    fn test_list_schemas() {
        let (_temp, backend) = setup();
        backend.create_schema("orders", b"{}").unwrap();

        assert_eq!(backend.list_schemas().unwrap(), vec!["orders", "users"]);
    }
}
