//! Schema subsystem for peanuts
//!
//! A schema is a named, ordered set of typed field declarations. Records are
//! validated against it field by field before they reach storage.
//!
//! # Design Principles
//!
//! - Exact types, no coercion (bool is not integer, integer is not float)
//! - Arrays are homogeneous; every element is checked
//! - Partial records are allowed; only supplied fields are checked
//! - A failed validation rejects the whole record
//! - Validation is pure and deterministic

mod declaration;
mod errors;
mod manifest;
mod payload;
mod table;
mod types;
mod validator;

pub use declaration::{parse_declaration, parse_declaration_tokens};
pub use errors::{SchemaError, SchemaResult};
pub use manifest::SchemaManifest;
pub use payload::{RawRecord, RawValue};
pub use table::Schema;
pub use types::{value_type_name, FieldDef, FieldType, ScalarType};
pub use validator::{validate_raw, validate_value, RecordValidator, UnknownFieldPolicy};
