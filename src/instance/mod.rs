//! Database instance
//!
//! Entry point for callers. Owns the schemas of one named database, creates
//! and drops them, and re-discovers them from storage on open.

mod database;

pub use database::Instance;
