//! Record validation against declared field types
//!
//! Validation semantics:
//! - Only keys present in the payload are checked (partial records allowed)
//! - Declared keys must match their type exactly, no coercion
//! - Array fields check every element; the first mismatch aborts
//! - Undeclared keys follow the schema's `UnknownFieldPolicy`
//! - Any failure rejects the whole record
//!
//! Validation is pure and deterministic.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{SchemaError, SchemaResult};
use super::payload::{RawRecord, RawValue};
use super::types::{value_type_name, FieldDef, FieldType};
use crate::storage::Record;

/// What to do with payload keys the schema does not declare
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownFieldPolicy {
    /// Store the value as given, without type enforcement
    #[default]
    Store,
    /// Silently discard the key
    Drop,
    /// Fail the write with `UndeclaredField`
    Reject,
}

/// Checks a structured value against a declared type.
pub fn validate_value(field: &str, field_type: FieldType, value: &Value) -> SchemaResult<()> {
    let base = field_type.base();

    if !field_type.is_array() {
        if base.accepts(value) {
            return Ok(());
        }
        return Err(SchemaError::type_conflict(
            field,
            base.type_name(),
            value_type_name(value),
        ));
    }

    let items = value.as_array().ok_or_else(|| {
        SchemaError::type_conflict(field, field_type.expected_name(), value_type_name(value))
    })?;

    match items.iter().find(|item| !base.accepts(item)) {
        Some(item) => Err(SchemaError::type_conflict(
            field,
            base.type_name(),
            value_type_name(item),
        )),
        None => Ok(()),
    }
}

/// Turns a raw value into a validated value for a declared type.
///
/// Text for a STRING field is taken verbatim. Text for any other type must
/// decode as a JSON literal first.
pub fn validate_raw(field: &str, field_type: FieldType, raw: RawValue) -> SchemaResult<Value> {
    let value = match raw {
        RawValue::Text(text) if field_type == FieldType::String => return Ok(Value::String(text)),
        RawValue::Text(text) => serde_json::from_str(text.trim()).map_err(|e| {
            SchemaError::MalformedInput(format!(
                "field '{}' is not a valid {} literal: {}",
                field, field_type, e
            ))
        })?,
        RawValue::Json(value) => value,
    };

    validate_value(field, field_type, &value)?;
    Ok(value)
}

/// Validates whole payloads against an ordered field list.
pub struct RecordValidator<'a> {
    fields: &'a [FieldDef],
    unknown_fields: UnknownFieldPolicy,
}

impl<'a> RecordValidator<'a> {
    pub fn new(fields: &'a [FieldDef], unknown_fields: UnknownFieldPolicy) -> Self {
        Self {
            fields,
            unknown_fields,
        }
    }

    fn declared_type(&self, field: &str) -> Option<FieldType> {
        self.fields
            .iter()
            .find(|def| def.name == field)
            .map(|def| def.field_type)
    }

    /// Validates every supplied field and assembles the record.
    ///
    /// # Errors
    ///
    /// - `TypeConflict` for a declared field with the wrong type
    /// - `MalformedInput` for raw text that does not decode
    /// - `UndeclaredField` for unknown keys under `UnknownFieldPolicy::Reject`
    pub fn validate(&self, raw: RawRecord) -> SchemaResult<Record> {
        let mut record = Record::new();

        for (field, value) in raw {
            match self.declared_type(&field) {
                Some(field_type) => {
                    let validated = validate_raw(&field, field_type, value)?;
                    record.insert(field, validated);
                }
                None => match self.unknown_fields {
                    UnknownFieldPolicy::Store => record.insert(field, value.into_untyped()),
                    UnknownFieldPolicy::Drop => {}
                    UnknownFieldPolicy::Reject => return Err(SchemaError::UndeclaredField(field)),
                },
            }
        }

        Ok(record)
    }
}
