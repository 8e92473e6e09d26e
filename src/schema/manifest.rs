//! Persisted schema definition
//!
//! Stored next to the schema's records so a reopened database can re-register
//! its schemas with their field types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::{SchemaError, SchemaResult};
use super::types::FieldDef;

/// On-disk schema definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaManifest {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub fields: Vec<FieldDef>,
}

impl SchemaManifest {
    pub fn new(name: impl Into<String>, fields: Vec<FieldDef>) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            fields,
        }
    }

    pub fn to_bytes(&self) -> SchemaResult<Vec<u8>> {
        serde_json::to_vec_pretty(self).map_err(|e| {
            SchemaError::MalformedSchema(format!("failed to serialize manifest: {}", e))
        })
    }

    /// Parses a manifest, checking it belongs to `schema`.
    pub fn from_bytes(schema: &str, bytes: &[u8]) -> SchemaResult<Self> {
        let manifest: SchemaManifest = serde_json::from_slice(bytes).map_err(|e| {
            SchemaError::MalformedSchema(format!("manifest for '{}' is invalid: {}", schema, e))
        })?;

        if manifest.name != schema {
            return Err(SchemaError::MalformedSchema(format!(
                "manifest in '{}' names schema '{}'",
                schema, manifest.name
            )));
        }

        Ok(manifest)
    }
}
