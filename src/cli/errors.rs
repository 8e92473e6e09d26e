//! CLI-specific error types
//!
//! Every failure ends the command with an error response and exit code 1.

use std::fmt;
use std::io;

use crate::errors::PeanutsError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file or override error
    ConfigError,
    /// I/O error (stdout)
    IoError,
    /// Arguments parsed but make no sense together
    InvalidArguments,
    /// Error returned by the database, carrying its stable code
    Database(&'static str),
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "PEANUTS_CLI_CONFIG_ERROR",
            Self::IoError => "PEANUTS_CLI_IO_ERROR",
            Self::InvalidArguments => "PEANUTS_CLI_INVALID_ARGUMENTS",
            Self::Database(code) => code,
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::InvalidArguments, msg)
    }

    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<PeanutsError> for CliError {
    fn from(e: PeanutsError) -> Self {
        match e {
            PeanutsError::Config(msg) => Self::config_error(msg),
            other => Self::new(CliErrorCode::Database(other.code()), other.to_string()),
        }
    }
}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
