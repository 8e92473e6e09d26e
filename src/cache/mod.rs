//! Record cache subsystem for peanuts
//!
//! Each schema owns one cache. The cache sits between callers and storage:
//! writes go through it, reads fall back to storage on a miss, and explicit
//! loads warm it in bulk. Nothing in the cache is persisted.

mod record_cache;
mod report;

pub use record_cache::{CacheStats, RecordCache};
pub use report::{FailureSummary, LoadFailure, LoadReport, LoadSummary};
