//! CLI argument definitions using clap
//!
//! Commands:
//! - peanuts <db> create-schema <name> [<field> <TYPE>]...
//! - peanuts <db> drop-schema <name>
//! - peanuts <db> display-schema <name>
//! - peanuts <db> list-schemas
//! - peanuts <db> load-cache [<schema>...] [--id <id>]...
//! - peanuts <db> insert <schema> <id> <payload>...
//! - peanuts <db> select <schema> <id>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// peanuts - a small schema-typed record store
#[derive(Parser, Debug)]
#[command(name = "peanuts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database name (a directory under the data directory)
    pub database: String,

    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Overrides `data_dir` from the configuration
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Overrides `log_level` from the configuration
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Declare a schema from alternating field names and types
    CreateSchema {
        name: String,
        /// `field TYPE field TYPE ...`
        spec: Vec<String>,
    },

    /// Delete a schema and every record in it
    DropSchema { name: String },

    /// Show a schema's declared fields
    DisplaySchema { name: String },

    /// List the database's schemas
    ListSchemas,

    /// Read records from disk into the cache
    LoadCache {
        /// Schemas to load; all when omitted
        schemas: Vec<String>,

        /// Load only these record ids
        #[arg(long = "id", requires = "schemas")]
        ids: Vec<String>,
    },

    /// Validate and store a record
    Insert {
        schema: String,
        id: String,
        /// A JSON object, or `key=value` tokens
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        payload: Vec<String>,
    },

    /// Read a record
    Select { schema: String, id: String },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
