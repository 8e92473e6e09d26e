//! Record storage subsystem for peanuts
//!
//! Records live one per file under `<database>/<schema>/<record id>`, each a
//! JSON object of field values.
//!
//! # Design Principles
//!
//! - One addressable unit per record; overwrite-or-create, no versioning
//! - Atomic replace (temp file, fsync, rename) on every write
//! - Identifiers validated before any path is built
//! - Backends are stateless projections addressed by (schema, id)

mod backend;
mod errors;
mod identifier;
mod local;
mod memory;
mod record;

pub use backend::StorageBackend;
pub use errors::{StorageError, StorageResult};
pub use identifier::{is_valid_identifier, validate_identifier, MAX_IDENTIFIER_LEN};
pub use local::{LocalBackend, MANIFEST_FILE_NAME};
pub use memory::MemoryBackend;
pub use record::Record;
