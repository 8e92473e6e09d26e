//! A named database: the registry of its schemas

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::cache::LoadReport;
use crate::config::Config;
use crate::errors::{PeanutsError, PeanutsResult};
use crate::schema::{RawRecord, Schema, UnknownFieldPolicy};
use crate::storage::{validate_identifier, LocalBackend, Record, StorageBackend};

/// Owns every schema of one database
///
/// A schema whose manifest cannot be read is held aside as unreadable: it
/// keeps its name, every lookup of it returns the error it failed with, and
/// it can still be dropped.
#[derive(Debug)]
pub struct Instance {
    name: String,
    backend: Arc<dyn StorageBackend>,
    unknown_fields: UnknownFieldPolicy,
    schemas: BTreeMap<String, Schema>,
    unreadable: BTreeMap<String, PeanutsError>,
}

impl Instance {
    /// Opens `./<name>` with default configuration.
    pub fn open(name: &str) -> PeanutsResult<Self> {
        Self::open_with_config(&Config::default(), name)
    }

    /// Opens `<data_dir>/<name>`, creating the directory if needed.
    pub fn open_with_config(config: &Config, name: &str) -> PeanutsResult<Self> {
        let backend = LocalBackend::open(&config.data_dir, name)?;
        Self::with_backend(name, Arc::new(backend), config.unknown_fields)
    }

    /// Opens a database over an existing backend.
    ///
    /// Every schema already in storage is re-registered from its manifest.
    /// Caches start cold. A schema that fails to open does not stop the
    /// others; see [`Instance::unreadable_schemas`].
    pub fn with_backend(
        name: &str,
        backend: Arc<dyn StorageBackend>,
        unknown_fields: UnknownFieldPolicy,
    ) -> PeanutsResult<Self> {
        validate_identifier("database", name)?;

        let mut schemas = BTreeMap::new();
        let mut unreadable = BTreeMap::new();
        for schema_name in backend.list_schemas()? {
            match Schema::open(backend.clone(), &schema_name, unknown_fields) {
                Ok(schema) => {
                    schemas.insert(schema_name, schema);
                }
                Err(e) => {
                    unreadable.insert(schema_name, e);
                }
            }
        }

        Ok(Self {
            name: name.to_string(),
            backend,
            unknown_fields,
            schemas,
            unreadable,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    /// Schemas present in storage that failed to open, with the failure
    pub fn unreadable_schemas(&self) -> impl Iterator<Item = (&str, &PeanutsError)> {
        self.unreadable.iter().map(|(name, err)| (name.as_str(), err))
    }

    /// Declares a new schema from `field type ...` text.
    ///
    /// # Errors
    ///
    /// - `DuplicateSchema` if the name is already registered
    /// - `MalformedSchema` / `InvalidIdentifier` from the declaration
    pub fn add_schema(&mut self, name: &str, spec: &str) -> PeanutsResult<&mut Schema> {
        if self.schemas.contains_key(name) || self.unreadable.contains_key(name) {
            return Err(PeanutsError::DuplicateSchema(name.to_string()));
        }

        let schema = Schema::declare(self.backend.clone(), name, spec, self.unknown_fields)?;
        Ok(self.schemas.entry(name.to_string()).or_insert(schema))
    }

    /// Removes a schema, its directory and every record in it.
    ///
    /// Unreadable schemas are removed the same way.
    pub fn drop_schema(&mut self, name: &str) -> PeanutsResult<()> {
        if let Some(schema) = self.schemas.remove(name) {
            return schema.destroy();
        }
        if self.unreadable.remove(name).is_some() {
            self.backend.delete_schema_dir(name)?;
            return Ok(());
        }
        Err(PeanutsError::SchemaNotFound(name.to_string()))
    }

    /// Looks up a registered schema.
    ///
    /// # Errors
    ///
    /// - `SchemaNotFound` if no such schema exists
    /// - the open failure (e.g. `MalformedSchema`) for an unreadable schema
    pub fn schema(&self, name: &str) -> PeanutsResult<&Schema> {
        self.schemas
            .get(name)
            .ok_or_else(|| lookup_error(&self.unreadable, name))
    }

    pub fn schema_mut(&mut self, name: &str) -> PeanutsResult<&mut Schema> {
        let unreadable = &self.unreadable;
        self.schemas
            .get_mut(name)
            .ok_or_else(|| lookup_error(unreadable, name))
    }

    pub fn contains_schema(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Registered schema names, sorted
    pub fn schema_names(&self) -> Vec<&str> {
        self.schemas.keys().map(String::as_str).collect()
    }

    pub fn schemas(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.values()
    }

    pub fn write(&mut self, schema: &str, id: &str, raw: RawRecord) -> PeanutsResult<Record> {
        self.schema_mut(schema)?.write(id, raw)
    }

    pub fn read(&mut self, schema: &str, id: &str) -> PeanutsResult<Record> {
        self.schema_mut(schema)?.read(id)
    }

    /// Loads one schema's cache; every record when `ids` is `None`.
    pub fn load_cache(&mut self, schema: &str, ids: Option<&[String]>) -> PeanutsResult<LoadReport> {
        Ok(self.schema_mut(schema)?.cache_mut().load(ids)?)
    }

    /// Loads every record of every schema, one report per schema.
    pub fn load_all_caches(&mut self) -> PeanutsResult<Vec<(String, LoadReport)>> {
        let mut reports = Vec::with_capacity(self.schemas.len());
        for (name, schema) in self.schemas.iter_mut() {
            let report = schema.cache_mut().load_all()?;
            reports.push((name.clone(), report));
        }
        Ok(reports)
    }
}

fn lookup_error(unreadable: &BTreeMap<String, PeanutsError>, name: &str) -> PeanutsError {
    unreadable
        .get(name)
        .cloned()
        .unwrap_or_else(|| PeanutsError::SchemaNotFound(name.to_string()))
}
