//! Crash testing framework
//!
//! - Crash injection at named points via `PEANUTS_CRASH_POINT`
//! - Subprocess management
//! - Post-crash validation

pub mod harness;
pub mod scenarios;

pub use harness::*;
