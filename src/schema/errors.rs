//! Schema error types
//!
//! Error codes:
//! - PEANUTS_TYPE_CONFLICT
//! - PEANUTS_MALFORMED_INPUT
//! - PEANUTS_MALFORMED_SCHEMA
//! - PEANUTS_UNDECLARED_FIELD

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Declaration and validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A field value's runtime shape does not match its declared type
    #[error("Type conflict on field '{field}': expected {expected}, got {actual}")]
    TypeConflict {
        field: String,
        expected: String,
        actual: String,
    },

    /// Payload could not be parsed before type validation
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Schema declaration could not be parsed
    #[error("Malformed schema: {0}")]
    MalformedSchema(String),

    /// Field not declared by the schema (rejecting policy only)
    #[error("Undeclared field: {0}")]
    UndeclaredField(String),
}

impl SchemaError {
    pub fn type_conflict(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        SchemaError::TypeConflict {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaError::TypeConflict { .. } => "PEANUTS_TYPE_CONFLICT",
            SchemaError::MalformedInput(_) => "PEANUTS_MALFORMED_INPUT",
            SchemaError::MalformedSchema(_) => "PEANUTS_MALFORMED_SCHEMA",
            SchemaError::UndeclaredField(_) => "PEANUTS_UNDECLARED_FIELD",
        }
    }
}
