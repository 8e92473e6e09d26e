//! Crate-level error type
//!
//! Wraps the subsystem errors and adds the schema registry and configuration
//! failures. Every variant is recoverable: the library never terminates the
//! process and never prints, it returns these for the front end to render.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::storage::StorageError;

/// Result type for instance-level operations
pub type PeanutsResult<T> = Result<T, PeanutsError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeanutsError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Schema not found: {0}")]
    SchemaNotFound(String),

    #[error("Schema already exists: {0}")]
    DuplicateSchema(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl PeanutsError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            PeanutsError::Schema(e) => e.code(),
            PeanutsError::Storage(e) => e.code(),
            PeanutsError::SchemaNotFound(_) => "PEANUTS_SCHEMA_NOT_FOUND",
            PeanutsError::DuplicateSchema(_) => "PEANUTS_DUPLICATE_SCHEMA",
            PeanutsError::Config(_) => "PEANUTS_CONFIG_ERROR",
        }
    }

    /// True for the storage-level "no such record" miss
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            PeanutsError::Storage(StorageError::RecordNotFound(_)) | PeanutsError::SchemaNotFound(_)
        )
    }
}
