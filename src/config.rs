//! Configuration file handling
//!
//! ```json
//! {
//!   "data_dir": "/var/lib/peanuts",
//!   "unknown_fields": "store",
//!   "log_level": "warn"
//! }
//! ```
//!
//! Every key is optional. Databases live at `<data_dir>/<database>`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PeanutsError, PeanutsResult};
use crate::observability::Severity;
use crate::schema::UnknownFieldPolicy;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one subdirectory per database (default ".")
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Handling of payload keys a schema does not declare (default "store")
    #[serde(default)]
    pub unknown_fields: UnknownFieldPolicy,

    /// Minimum severity written by the front end's logger (default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            unknown_fields: UnknownFieldPolicy::default(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> PeanutsResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            PeanutsError::Config(format!("Failed to read config {}: {}", path.display(), e))
        })?;

        Self::from_json(&content)
    }

    /// Parse configuration from JSON text
    pub fn from_json(content: &str) -> PeanutsResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| PeanutsError::Config(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> PeanutsResult<()> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(PeanutsError::Config("data_dir must not be empty".into()));
        }

        self.log_severity()?;
        Ok(())
    }

    /// Parsed `log_level`
    pub fn log_severity(&self) -> PeanutsResult<Severity> {
        self.log_level.parse().map_err(|_| {
            PeanutsError::Config(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error, fatal.",
                self.log_level
            ))
        })
    }

    /// Directory of a named database
    pub fn database_path(&self, database: &str) -> PathBuf {
        self.data_dir.join(database)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Store);
        assert_eq!(config.log_severity().unwrap(), Severity::Warn);
    }

    #[test]
    fn test_load_from_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("peanuts.json");
        fs::write(
            &path,
            r#"{"data_dir": "/srv/db", "unknown_fields": "reject", "log_level": "INFO"}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/srv/db"));
        assert_eq!(config.unknown_fields, UnknownFieldPolicy::Reject);
        assert_eq!(config.log_severity().unwrap(), Severity::Info);
        assert_eq!(config.database_path("shop"), PathBuf::from("/srv/db/shop"));
    }

    #[test]
    fn test_missing_file() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(&temp.path().join("absent.json"));
        assert!(matches!(result, Err(PeanutsError::Config(_))));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            Config::from_json(r#"{"log_level": "loud"}"#),
            Err(PeanutsError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"unknown_fields": "maybe"}"#),
            Err(PeanutsError::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"data_dir": ""}"#),
            Err(PeanutsError::Config(_))
        ));
    }
}
