//! A declared schema together with its record cache
//!
//! Write path: validate id -> validate fields -> persist -> update cache.
//! Read path: cache hit, or one storage fetch that fills the cache.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::declaration::parse_declaration;
use super::errors::SchemaError;
use super::manifest::SchemaManifest;
use super::payload::RawRecord;
use super::types::{FieldDef, FieldType};
use super::validator::{RecordValidator, UnknownFieldPolicy};
use crate::cache::RecordCache;
use crate::errors::PeanutsResult;
use crate::storage::{validate_identifier, Record, StorageBackend};

/// A named, typed record definition and its cache
#[derive(Debug)]
pub struct Schema {
    name: String,
    created_at: DateTime<Utc>,
    fields: Vec<FieldDef>,
    unknown_fields: UnknownFieldPolicy,
    backend: Arc<dyn StorageBackend>,
    cache: RecordCache,
}

impl Schema {
    /// Declares a schema from `field type field type ...` text.
    ///
    /// Creates the schema's storage container together with its manifest.
    pub fn declare(
        backend: Arc<dyn StorageBackend>,
        name: &str,
        spec: &str,
        unknown_fields: UnknownFieldPolicy,
    ) -> PeanutsResult<Self> {
        let fields = parse_declaration(spec)?;
        Self::declare_fields(backend, name, fields, unknown_fields)
    }

    /// Declares a schema from already-parsed field definitions.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` if the schema or a field name is not storage-safe
    /// - `MalformedSchema` if a field is declared twice
    /// - a storage error if the schema already exists in storage
    pub fn declare_fields(
        backend: Arc<dyn StorageBackend>,
        name: &str,
        fields: Vec<FieldDef>,
        unknown_fields: UnknownFieldPolicy,
    ) -> PeanutsResult<Self> {
        validate_identifier("schema", name)?;
        for (i, def) in fields.iter().enumerate() {
            validate_identifier("field", &def.name)?;
            if fields[..i].iter().any(|earlier| earlier.name == def.name) {
                return Err(SchemaError::MalformedSchema(format!(
                    "field '{}' declared more than once",
                    def.name
                ))
                .into());
            }
        }

        let manifest = SchemaManifest::new(name, fields);
        backend.create_schema(name, &manifest.to_bytes()?)?;

        Ok(Self::from_manifest(backend, manifest, unknown_fields))
    }

    /// Re-opens a schema already present in storage.
    ///
    /// A container with no manifest is opened with no declared fields.
    pub fn open(
        backend: Arc<dyn StorageBackend>,
        name: &str,
        unknown_fields: UnknownFieldPolicy,
    ) -> PeanutsResult<Self> {
        validate_identifier("schema", name)?;

        let manifest = match backend.read_manifest(name)? {
            Some(bytes) => SchemaManifest::from_bytes(name, &bytes)?,
            None => SchemaManifest::new(name, Vec::new()),
        };

        Ok(Self::from_manifest(backend, manifest, unknown_fields))
    }

    fn from_manifest(
        backend: Arc<dyn StorageBackend>,
        manifest: SchemaManifest,
        unknown_fields: UnknownFieldPolicy,
    ) -> Self {
        let cache = RecordCache::new(manifest.name.clone(), backend.clone());
        Self {
            name: manifest.name,
            created_at: manifest.created_at,
            fields: manifest.fields,
            unknown_fields,
            backend,
            cache,
        }
    }

    /// Deletes the schema's storage, every record in it, and the cache.
    ///
    /// Consumes the schema: nothing can use it afterwards.
    pub fn destroy(self) -> PeanutsResult<()> {
        self.backend.delete_schema_dir(&self.name)?;
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Declared fields in declaration order
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field_type(&self, field: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|def| def.name == field)
            .map(|def| def.field_type)
    }

    /// Metadata view: (field, type) rows in declaration order
    pub fn display(&self) -> Vec<(String, FieldType)> {
        self.fields
            .iter()
            .map(|def| (def.name.clone(), def.field_type))
            .collect()
    }

    /// Validates and stores a record, replacing any previous value for `id`.
    ///
    /// Nothing is persisted or cached unless every field validates.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier` for a storage-unsafe id
    /// - `TypeConflict`, `MalformedInput`, `UndeclaredField` from validation
    /// - storage I/O failures
    pub fn write(&mut self, id: &str, raw: RawRecord) -> PeanutsResult<Record> {
        validate_identifier("record", id)?;

        let record = RecordValidator::new(&self.fields, self.unknown_fields).validate(raw)?;
        self.backend.persist(&self.name, id, &record)?;
        self.cache.put(id, record.clone());

        Ok(record)
    }

    /// Reads a record through the cache.
    ///
    /// # Errors
    ///
    /// `RecordNotFound` if the record is in neither the cache nor storage.
    pub fn read(&mut self, id: &str) -> PeanutsResult<Record> {
        Ok(self.cache.get(id)?.clone())
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut RecordCache {
        &mut self.cache
    }
}
