//! Crash point injection for exercising atomic writes
//!
//! When `PEANUTS_CRASH_POINT` names a point reached during a write, the
//! process terminates via `std::process::abort()` with no cleanup and no
//! unwinding. The storage backend places points between the temp-file write
//! and the rename, and between staging a new schema directory and publishing
//! it, so an aborted run shows whether a partial record or schema can leak.
//!
//! ```bash
//! PEANUTS_CRASH_POINT=record_before_rename peanuts mydb insert users u1 name=Ann
//! ```

use std::sync::OnceLock;

static CRASH_POINT: OnceLock<Option<String>> = OnceLock::new();

#[inline]
fn configured_point() -> Option<&'static str> {
    CRASH_POINT
        .get_or_init(|| std::env::var("PEANUTS_CRASH_POINT").ok())
        .as_deref()
}

/// Returns true if `PEANUTS_CRASH_POINT` equals the given name.
#[inline]
pub fn crash_point_enabled(name: &str) -> bool {
    configured_point().map(|p| p == name).unwrap_or(false)
}

/// Aborts the process if the named crash point is enabled.
///
/// No-op when `PEANUTS_CRASH_POINT` is unset or names another point.
#[inline]
pub fn maybe_crash(name: &str) {
    if crash_point_enabled(name) {
        eprintln!("[CRASH] Triggering crash at point: {}", name);
        std::process::abort();
    }
}

/// All defined crash point names
pub mod points {
    pub const RECORD_BEFORE_RENAME: &str = "record_before_rename";
    pub const RECORD_AFTER_RENAME: &str = "record_after_rename";
    pub const MANIFEST_BEFORE_RENAME: &str = "manifest_before_rename";
    pub const SCHEMA_BEFORE_PUBLISH: &str = "schema_before_publish";
    pub const SCHEMA_DIR_BEFORE_DELETE: &str = "schema_dir_before_delete";

    pub fn all() -> &'static [&'static str] {
        &[
            RECORD_BEFORE_RENAME,
            RECORD_AFTER_RENAME,
            MANIFEST_BEFORE_RENAME,
            SCHEMA_BEFORE_PUBLISH,
            SCHEMA_DIR_BEFORE_DELETE,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crash_point_disabled_by_default() {
        assert!(!crash_point_enabled("not_a_real_point"));
        // Reaching an unknown point must be a no-op.
        maybe_crash("not_a_real_point");
    }

    #[test]
    fn test_crash_point_names_are_lowercase_with_underscores() {
        for point in points::all() {
            assert!(
                point.chars().all(|c| c.is_lowercase() || c == '_'),
                "Crash point '{}' should be lowercase with underscores",
                point
            );
        }
    }
}
