//! peanuts - a small schema-typed record store
//!
//! Named schemas declare typed fields; records are validated against them
//! field by field, stored one JSON file per record, and read back through a
//! per-schema cache.
//!
//! ```ignore
//! use peanuts::{Instance, RawRecord};
//!
//! let mut db = Instance::open("shop")?;
//! db.add_schema("user", "name STRING age INTEGER")?;
//! db.write("user", "u1", RawRecord::parse(r#"{"name": "Ann", "age": 30}"#)?)?;
//! let record = db.read("user", "u1")?;
//! ```

pub mod cache;
pub mod cli;
pub mod config;
pub mod crash_point;
pub mod errors;
pub mod instance;
pub mod observability;
pub mod schema;
pub mod storage;

pub use cache::{LoadReport, RecordCache};
pub use config::Config;
pub use errors::{PeanutsError, PeanutsResult};
pub use instance::Instance;
pub use schema::{FieldType, RawRecord, RawValue, Schema, UnknownFieldPolicy};
pub use storage::{LocalBackend, MemoryBackend, Record, StorageBackend};
