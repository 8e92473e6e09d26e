//! Identifier validation for storage addressing
//!
//! Database, schema, field and record names all become path components (or
//! may become one), so they share one rule: ASCII letters, digits, `_`, `-`
//! and `.`, not starting with `.`. This rejects `.`, `..`, path separators
//! and hidden names, which keeps the backend's own dotfiles (temp files and
//! the schema manifest) out of the record namespace.

use regex::Regex;
use std::sync::OnceLock;

use super::errors::{StorageError, StorageResult};

/// Maximum identifier length in bytes (common filesystem name limit)
pub const MAX_IDENTIFIER_LEN: usize = 255;

const PATTERN: &str = r"^[A-Za-z0-9_-][A-Za-z0-9_.-]*$";

static IDENTIFIER_RE: OnceLock<Regex> = OnceLock::new();

fn identifier_re() -> &'static Regex {
    IDENTIFIER_RE.get_or_init(|| Regex::new(PATTERN).expect("identifier pattern is valid"))
}

/// Returns true if `name` is safe to use as a single path component.
pub fn is_valid_identifier(name: &str) -> bool {
    !name.is_empty() && name.len() <= MAX_IDENTIFIER_LEN && identifier_re().is_match(name)
}

/// Validates an identifier, naming what it identifies in the error.
pub fn validate_identifier(kind: &str, name: &str) -> StorageResult<()> {
    if name.is_empty() {
        return Err(StorageError::InvalidIdentifier(format!(
            "{} name cannot be empty",
            kind
        )));
    }

    if name.len() > MAX_IDENTIFIER_LEN {
        return Err(StorageError::InvalidIdentifier(format!(
            "{} name too long (max {} bytes)",
            kind, MAX_IDENTIFIER_LEN
        )));
    }

    if !identifier_re().is_match(name) {
        return Err(StorageError::InvalidIdentifier(format!(
            "{} name '{}' must use letters, digits, '_', '-' or '.' and not start with '.'",
            kind, name
        )));
    }

    Ok(())
}
