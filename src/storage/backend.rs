//! # Storage Backend Trait

use super::errors::StorageResult;
use super::record::Record;

/// Backend trait for record storage.
///
/// Records are addressed by (schema name, record id). Implementations validate
/// both names before touching storage and fail with `InvalidIdentifier` rather
/// than resolving an unsafe path.
pub trait StorageBackend: Send + Sync + std::fmt::Debug {
    /// Create a schema's container holding its manifest.
    ///
    /// The schema becomes visible to `list_schemas` only once the manifest is
    /// in place: an interrupted create leaves nothing behind under the schema
    /// name. Fails if the schema already exists in storage.
    fn create_schema(&self, schema: &str, manifest: &[u8]) -> StorageResult<()>;

    /// Recursively delete a schema's records and manifest.
    ///
    /// Deleting an absent schema succeeds.
    fn delete_schema_dir(&self, schema: &str) -> StorageResult<()>;

    /// List schema names present in storage, sorted
    fn list_schemas(&self) -> StorageResult<Vec<String>>;

    /// Overwrite-or-create a record. Never exposes a partially written record.
    fn persist(&self, schema: &str, id: &str, record: &Record) -> StorageResult<()>;

    /// Fetch a record, failing with `RecordNotFound` if absent
    fn fetch(&self, schema: &str, id: &str) -> StorageResult<Record>;

    /// List record ids stored for a schema, sorted
    fn list_records(&self, schema: &str) -> StorageResult<Vec<String>>;

    /// Read the schema manifest bytes, if one was written
    fn read_manifest(&self, schema: &str) -> StorageResult<Option<Vec<u8>>>;
}
