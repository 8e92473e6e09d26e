//! Outcome of a cache load

use serde::Serialize;

use crate::storage::StorageError;

/// An identifier that could not be loaded, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub id: String,
    pub error: StorageError,
}

/// Per-item outcome of a bulk load.
///
/// Failures are isolated: one bad identifier never prevents the others from
/// loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Identifiers now present in the cache
    pub loaded: Vec<String>,
    /// Identifiers with no backing record
    pub missing: Vec<String>,
    /// Identifiers that exist but could not be read or were invalid
    pub failed: Vec<LoadFailure>,
}

impl LoadReport {
    /// True if every requested identifier was loaded
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.loaded.len() + self.missing.len() + self.failed.len()
    }

    pub(crate) fn record_failure(&mut self, id: &str, error: StorageError) {
        match error {
            StorageError::RecordNotFound(_) => self.missing.push(id.to_string()),
            error => self.failed.push(LoadFailure {
                id: id.to_string(),
                error,
            }),
        }
    }

    /// Serializable summary for front ends
    pub fn summary(&self) -> LoadSummary<'_> {
        LoadSummary {
            loaded: &self.loaded,
            missing: &self.missing,
            failed: self
                .failed
                .iter()
                .map(|f| FailureSummary {
                    id: &f.id,
                    code: f.error.code(),
                    message: f.error.to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoadSummary<'a> {
    pub loaded: &'a [String],
    pub missing: &'a [String],
    pub failed: Vec<FailureSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct FailureSummary<'a> {
    pub id: &'a str,
    pub code: &'static str,
    pub message: String,
}
