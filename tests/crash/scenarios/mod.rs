//! Crash scenarios, one module per write path

mod record;
mod schema;
