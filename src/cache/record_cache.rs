//! Per-schema record cache
//!
//! - Write-through: every successful write overwrites the entry
//! - Read-through: a miss does one storage fetch and fills the entry
//! - Explicit bulk load, whole schema or selected ids
//! - No eviction; entries live for the session

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

use super::report::LoadReport;
use crate::storage::{Record, StorageBackend, StorageResult};

/// Cache statistics.
///
/// Passive only: counters never influence caching decisions.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Reads served from memory
    pub hits: u64,
    /// Reads that went to storage
    pub misses: u64,
    /// Records brought in by explicit loads
    pub loaded: u64,
}

/// In-memory mapping from record id to record for one schema
#[derive(Debug)]
pub struct RecordCache {
    schema: String,
    backend: Arc<dyn StorageBackend>,
    entries: HashMap<String, Record>,
    stats: CacheStats,
}

impl RecordCache {
    /// Create an empty (cold) cache over `schema`'s storage.
    pub fn new(schema: impl Into<String>, backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            schema: schema.into(),
            backend,
            entries: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Loads selected ids, or every stored record when `ids` is `None`.
    pub fn load(&mut self, ids: Option<&[String]>) -> StorageResult<LoadReport> {
        match ids {
            Some(ids) => Ok(self.load_ids(ids)),
            None => self.load_all(),
        }
    }

    /// Reads every record in the schema's storage into memory.
    ///
    /// Only failure to enumerate the records is an error; unreadable records
    /// are reported per item.
    pub fn load_all(&mut self) -> StorageResult<LoadReport> {
        let ids = self.backend.list_records(&self.schema)?;
        Ok(self.load_ids(&ids))
    }

    /// Reads the given ids into memory, refreshing any already cached.
    pub fn load_ids<S: AsRef<str>>(&mut self, ids: &[S]) -> LoadReport {
        let mut report = LoadReport::default();

        for id in ids {
            let id = id.as_ref();
            match self.backend.fetch(&self.schema, id) {
                Ok(record) => {
                    self.entries.insert(id.to_string(), record);
                    self.stats.loaded += 1;
                    report.loaded.push(id.to_string());
                }
                Err(e) => report.record_failure(id, e),
            }
        }

        report
    }

    /// Returns the cached record, fetching it from storage on a miss.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` if the id is in neither memory nor storage.
    pub fn get(&mut self, id: &str) -> StorageResult<&Record> {
        match self.entries.entry(id.to_string()) {
            Entry::Occupied(entry) => {
                self.stats.hits += 1;
                Ok(&*entry.into_mut())
            }
            Entry::Vacant(entry) => {
                self.stats.misses += 1;
                let record = self.backend.fetch(&self.schema, id)?;
                Ok(&*entry.insert(record))
            }
        }
    }

    /// Unconditionally overwrites the entry for `id`.
    pub fn put(&mut self, id: impl Into<String>, record: Record) {
        self.entries.insert(id.into(), record);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached ids, sorted
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Drops every entry. Storage is untouched.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryBackend, StorageError};
    use serde_json::json;

    fn setup() -> (Arc<MemoryBackend>, RecordCache) {
        let backend = Arc::new(MemoryBackend::new());
        backend.create_schema("users", b"{}").unwrap();

        let mut record = Record::new();
        record.insert("name", json!("Ann"));
        backend.persist("users", "u1", &record).unwrap();

        let mut record = Record::new();
        record.insert("name", json!("Bea"));
        backend.persist("users", "u2", &record).unwrap();

        let cache = RecordCache::new("users", backend.clone());
        (backend, cache)
    }

    #[test]
    fn test_miss_fills_then_hits() {
        let (backend, mut cache) = setup();

        assert!(cache.is_empty());
        assert_eq!(cache.get("u1").unwrap().get("name"), Some(&json!("Ann")));
        assert!(cache.contains("u1"));
        assert_eq!(cache.get("u1").unwrap().get("name"), Some(&json!("Ann")));

        assert_eq!(backend.fetch_count(), 1);
        assert_eq!(cache.stats().misses, 1);
        assert_eq!(cache.stats().hits, 1);
    }

    #[test]
    fn test_missing_record() {
        let (_backend, mut cache) = setup();

        assert_eq!(
            cache.get("nope").unwrap_err(),
            StorageError::RecordNotFound("nope".into())
        );
        assert!(!cache.contains("nope"));
    }

    #[test]
    fn test_put_overwrites_without_storage() {
        let (backend, mut cache) = setup();

        let mut record = Record::new();
        record.insert("name", json!("Cy"));
        cache.put("u1", record.clone());

        assert_eq!(cache.get("u1").unwrap(), &record);
        assert_eq!(backend.fetch_count(), 0);
    }

    #[test]
    fn test_load_all() {
        let (_backend, mut cache) = setup();

        let report = cache.load(None).unwrap();
        assert_eq!(report.loaded, vec!["u1", "u2"]);
        assert!(report.is_complete());
        assert_eq!(cache.ids(), vec!["u1", "u2"]);
        assert_eq!(cache.stats().loaded, 2);
    }

    #[test]
    fn test_load_ids_isolates_failures() {
        let (_backend, mut cache) = setup();

        let ids = vec!["u1".to_string(), "ghost".to_string(), "../x".to_string()];
        let report = cache.load(Some(ids.as_slice())).unwrap();

        assert_eq!(report.loaded, vec!["u1"]);
        assert_eq!(report.missing, vec!["ghost"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].id, "../x");
        assert!(cache.contains("u1"));
        assert!(!cache.contains("ghost"));
    }

    #[test]
    fn test_clear() {
        let (_backend, mut cache) = setup();
        cache.load_all().unwrap();

        cache.clear();
        assert!(cache.is_empty());
        assert!(!cache.contains("u1"));
    }
}
