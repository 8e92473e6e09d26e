//! Observable front-end events
//!
//! Events are explicit and typed.

use std::fmt;

use super::logger::Severity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// Configuration file loaded
    ConfigLoaded,
    /// Database directory opened and schemas discovered
    DatabaseOpened,

    /// Schema declared and stored
    SchemaCreated,
    /// Schema directory deleted
    SchemaDropped,
    /// Schema found in storage but its manifest could not be read
    SchemaUnreadable,

    /// Record validated and persisted
    RecordWritten,
    /// Record read through the cache
    RecordRead,
    /// Record write rejected by validation
    RecordRejected,

    /// Bulk cache load finished
    CacheLoaded,
    /// One id in a bulk load was absent from storage
    CacheLoadMiss,
    /// One id in a bulk load could not be read
    CacheLoadFailed,

    /// Command returned an error response
    CommandFailed,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatabaseOpened => "DATABASE_OPENED",

            Event::SchemaCreated => "SCHEMA_CREATED",
            Event::SchemaDropped => "SCHEMA_DROPPED",
            Event::SchemaUnreadable => "SCHEMA_UNREADABLE",

            Event::RecordWritten => "RECORD_WRITTEN",
            Event::RecordRead => "RECORD_READ",
            Event::RecordRejected => "RECORD_REJECTED",

            Event::CacheLoaded => "CACHE_LOADED",
            Event::CacheLoadMiss => "CACHE_LOAD_MISS",
            Event::CacheLoadFailed => "CACHE_LOAD_FAILED",

            Event::CommandFailed => "COMMAND_FAILED",
        }
    }

    /// Severity the event is logged at
    pub fn severity(&self) -> Severity {
        match self {
            Event::RecordRead => Severity::Trace,
            Event::CacheLoadMiss | Event::RecordRejected | Event::SchemaUnreadable => {
                Severity::Warn
            }
            Event::CacheLoadFailed | Event::CommandFailed => Severity::Error,
            _ => Severity::Info,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
