//! # In-Memory Backend
//!
//! Keeps records in process memory. Used by tests and by embedders that want
//! schema enforcement without touching disk. Applies the same identifier rules
//! as the filesystem backend so behaviour matches.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};

use super::backend::StorageBackend;
use super::errors::{StorageError, StorageResult};
use super::identifier::validate_identifier;
use super::record::Record;

#[derive(Debug, Default)]
struct SchemaSlot {
    manifest: Option<Vec<u8>>,
    records: BTreeMap<String, Record>,
}

/// In-memory storage backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    schemas: Mutex<BTreeMap<String, SchemaSlot>>,
    fetches: AtomicUsize,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `fetch` calls served so far (hits and misses).
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Adds a container with no manifest, as a hand-made directory would be
    #[cfg(test)]
    pub(crate) fn insert_bare_schema(&self, schema: &str) {
        if let Ok(mut schemas) = self.lock() {
            schemas.entry(schema.to_string()).or_default();
        }
    }

    /// Replaces a stored manifest in place
    #[cfg(test)]
    pub(crate) fn overwrite_manifest(&self, schema: &str, manifest: &[u8]) {
        if let Ok(mut schemas) = self.lock() {
            schemas.entry(schema.to_string()).or_default().manifest = Some(manifest.to_vec());
        }
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, SchemaSlot>>> {
        self.schemas
            .lock()
            .map_err(|_| StorageError::IoError("memory backend lock poisoned".into()))
    }
}

impl StorageBackend for MemoryBackend {
    fn create_schema(&self, schema: &str, manifest: &[u8]) -> StorageResult<()> {
        validate_identifier("schema", schema)?;

        match self.lock()?.entry(schema.to_string()) {
            Entry::Occupied(_) => Err(StorageError::IoError(format!(
                "schema container '{}' already exists",
                schema
            ))),
            Entry::Vacant(entry) => {
                entry.insert(SchemaSlot {
                    manifest: Some(manifest.to_vec()),
                    records: BTreeMap::new(),
                });
                Ok(())
            }
        }
    }

    fn delete_schema_dir(&self, schema: &str) -> StorageResult<()> {
        validate_identifier("schema", schema)?;
        self.lock()?.remove(schema);
        Ok(())
    }

    fn list_schemas(&self) -> StorageResult<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn persist(&self, schema: &str, id: &str, record: &Record) -> StorageResult<()> {
        validate_identifier("schema", schema)?;
        validate_identifier("record", id)?;

        let mut schemas = self.lock()?;
        let slot = schemas.get_mut(schema).ok_or_else(|| {
            StorageError::IoError(format!("schema container '{}' does not exist", schema))
        })?;
        slot.records.insert(id.to_string(), record.clone());
        Ok(())
    }

    fn fetch(&self, schema: &str, id: &str) -> StorageResult<Record> {
        validate_identifier("schema", schema)?;
        validate_identifier("record", id)?;
        self.fetches.fetch_add(1, Ordering::Relaxed);

        self.lock()?
            .get(schema)
            .and_then(|slot| slot.records.get(id))
            .cloned()
            .ok_or_else(|| StorageError::RecordNotFound(id.to_string()))
    }

    fn list_records(&self, schema: &str) -> StorageResult<Vec<String>> {
        validate_identifier("schema", schema)?;
        Ok(self
            .lock()?
            .get(schema)
            .map(|slot| slot.records.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn read_manifest(&self, schema: &str) -> StorageResult<Option<Vec<u8>>> {
        validate_identifier("schema", schema)?;
        Ok(self.lock()?.get(schema).and_then(|slot| slot.manifest.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_persist_fetch_counts() {
        let backend = MemoryBackend::new();
        backend.create_schema("users", b"{}").unwrap();

        let mut record = Record::new();
        record.insert("age", json!(30));
        backend.persist("users", "u1", &record).unwrap();

        assert_eq!(backend.fetch("users", "u1").unwrap(), record);
        assert!(matches!(
            backend.fetch("users", "u2"),
            Err(StorageError::RecordNotFound(_))
        ));
        assert_eq!(backend.fetch_count(), 2);
    }

    #[test]
    fn test_persist_requires_schema() {
        let backend = MemoryBackend::new();
        let result = backend.persist("users", "u1", &Record::new());
        assert!(matches!(result, Err(StorageError::IoError(_))));
    }

    #[test]
    fn test_delete_drops_records_and_manifest() {
        let backend = MemoryBackend::new();
        backend.create_schema("users", b"{}").unwrap();
        backend.persist("users", "u1", &Record::new()).unwrap();

        backend.delete_schema_dir("users").unwrap();
        assert!(backend.list_schemas().unwrap().is_empty());
        assert!(backend.list_records("users").unwrap().is_empty());
        assert_eq!(backend.read_manifest("users").unwrap(), None);
    }

    #[test]
    fn test_create_schema_is_exclusive() {
        let backend = MemoryBackend::new();
        backend.create_schema("users", b"{\"v\":1}").unwrap();
        backend.persist("users", "u1", &Record::new()).unwrap();

        assert!(matches!(
            backend.create_schema("users", b"{\"v\":2}"),
            Err(StorageError::IoError(_))
        ));
        assert_eq!(
            backend.read_manifest("users").unwrap(),
            Some(b"{\"v\":1}".to_vec())
        );
        assert_eq!(backend.list_records("users").unwrap(), vec!["u1"]);
    }
}
