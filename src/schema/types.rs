//! Field type definitions
//!
//! Supported types:
//! - STRING, INTEGER, FLOAT, BOOL: scalars with exact runtime types
//! - ARRAY_STRING, ARRAY_INTEGER, ARRAY_FLOAT, ARRAY_BOOL: homogeneous arrays
//!   of the matching scalar
//!
//! Integers and floats are distinct (`30` is not a FLOAT, `30.0` is not an
//! INTEGER) and bool is never a number.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::errors::SchemaError;

/// Scalar base type shared by a scalar field and its array counterpart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    String,
    Integer,
    Float,
    Bool,
}

impl ScalarType {
    /// Returns the type name used in conflict messages
    pub fn type_name(self) -> &'static str {
        match self {
            ScalarType::String => "string",
            ScalarType::Integer => "integer",
            ScalarType::Float => "float",
            ScalarType::Bool => "bool",
        }
    }

    /// The single dispatch point: one predicate per scalar type.
    pub fn accepts(self, value: &Value) -> bool {
        let predicate: fn(&Value) -> bool = match self {
            ScalarType::String => Value::is_string,
            ScalarType::Integer => is_integer,
            ScalarType::Float => Value::is_f64,
            ScalarType::Bool => Value::is_boolean,
        };
        predicate(value)
    }
}

fn is_integer(value: &Value) -> bool {
    value.is_i64() || value.is_u64()
}

/// Declared type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldType {
    String,
    Integer,
    Float,
    Bool,
    ArrayString,
    ArrayInteger,
    ArrayFloat,
    ArrayBool,
}

impl FieldType {
    pub const ALL: [FieldType; 8] = [
        FieldType::String,
        FieldType::Integer,
        FieldType::Float,
        FieldType::Bool,
        FieldType::ArrayString,
        FieldType::ArrayInteger,
        FieldType::ArrayFloat,
        FieldType::ArrayBool,
    ];

    /// Returns the scalar type checked for the value or for each element
    pub fn base(self) -> ScalarType {
        match self {
            FieldType::String | FieldType::ArrayString => ScalarType::String,
            FieldType::Integer | FieldType::ArrayInteger => ScalarType::Integer,
            FieldType::Float | FieldType::ArrayFloat => ScalarType::Float,
            FieldType::Bool | FieldType::ArrayBool => ScalarType::Bool,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            FieldType::ArrayString
                | FieldType::ArrayInteger
                | FieldType::ArrayFloat
                | FieldType::ArrayBool
        )
    }

    /// Returns the declaration token (e.g. `ARRAY_INTEGER`)
    pub fn token(self) -> &'static str {
        match self {
            FieldType::String => "STRING",
            FieldType::Integer => "INTEGER",
            FieldType::Float => "FLOAT",
            FieldType::Bool => "BOOL",
            FieldType::ArrayString => "ARRAY_STRING",
            FieldType::ArrayInteger => "ARRAY_INTEGER",
            FieldType::ArrayFloat => "ARRAY_FLOAT",
            FieldType::ArrayBool => "ARRAY_BOOL",
        }
    }

    /// Returns the expected-type description used in conflict messages
    pub fn expected_name(self) -> String {
        if self.is_array() {
            format!("array of {}", self.base().type_name())
        } else {
            self.base().type_name().to_string()
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    /// Parses a declaration token, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldType::ALL
            .into_iter()
            .find(|t| t.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                SchemaError::MalformedSchema(format!("unrecognized field type '{}'", s))
            })
    }
}

/// A single field declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

/// Returns the runtime type name of a JSON value for conflict messages.
pub fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
