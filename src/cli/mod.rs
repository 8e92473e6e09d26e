//! CLI module for peanuts
//!
//! One command per invocation against `<data_dir>/<database>`:
//! - create-schema / drop-schema / display-schema / list-schemas
//! - load-cache: warm caches from disk, reporting per-id outcomes
//! - insert / select: write and read single records

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{resolve_config, run, run_command};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{error_response, ok_response, write_error, write_response};
