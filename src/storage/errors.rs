//! Storage error types
//!
//! Error codes:
//! - PEANUTS_RECORD_NOT_FOUND
//! - PEANUTS_INVALID_IDENTIFIER
//! - PEANUTS_CORRUPT_RECORD
//! - PEANUTS_STORAGE_IO_ERROR

use thiserror::Error;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Record storage errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("Record not found: {0}")]
    RecordNotFound(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Corrupt record '{id}': {reason}")]
    CorruptRecord { id: String, reason: String },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl StorageError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            StorageError::RecordNotFound(_) => "PEANUTS_RECORD_NOT_FOUND",
            StorageError::InvalidIdentifier(_) => "PEANUTS_INVALID_IDENTIFIER",
            StorageError::CorruptRecord { .. } => "PEANUTS_CORRUPT_RECORD",
            StorageError::IoError(_) => "PEANUTS_STORAGE_IO_ERROR",
        }
    }

    pub(crate) fn io(context: impl std::fmt::Display, err: std::io::Error) -> Self {
        StorageError::IoError(format!("{}: {}", context, err))
    }
}
