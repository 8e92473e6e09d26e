//! Record representation shared by the cache and the storage backends
//!
//! A record is a JSON object mapping field names to validated values. On disk
//! it is stored verbatim as that object, so integers stay integers and arrays
//! stay arrays across a round trip.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::errors::{StorageError, StorageResult};

/// A single record's field values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a field value, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: Value) {
        self.fields.insert(field.into(), value);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Iterates fields in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    /// Serializes the record to its on-disk form.
    pub fn to_bytes(&self) -> StorageResult<Vec<u8>> {
        serde_json::to_vec_pretty(&self.fields)
            .map_err(|e| StorageError::IoError(format!("Failed to serialize record: {}", e)))
    }

    /// Parses a record from its on-disk form.
    ///
    /// Anything other than a JSON object is reported as corruption of `id`.
    pub fn from_bytes(id: &str, bytes: &[u8]) -> StorageResult<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| StorageError::CorruptRecord {
                id: id.to_string(),
                reason: format!("invalid JSON: {}", e),
            })?;

        match value {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(StorageError::CorruptRecord {
                id: id.to_string(),
                reason: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }
}

impl From<Map<String, Value>> for Record {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(record.fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
