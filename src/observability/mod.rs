//! Observability subsystem for peanuts
//!
//! Structured JSON-lines logging for the command-line front end. The library
//! itself never logs; it returns errors and reports for the caller to render.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use peanuts::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::RecordWritten, &[("schema", "users"), ("id", "u1")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
