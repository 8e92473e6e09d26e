//! CLI command implementations
//!
//! Each invocation: resolve configuration -> open the database (schemas are
//! rediscovered from disk) -> run one command -> print one JSON response.

use serde_json::{json, Value};

use crate::cache::LoadReport;
use crate::config::Config;
use crate::errors::{PeanutsError, PeanutsResult};
use crate::instance::Instance;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::schema::{RawRecord, Schema};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments, runs the command and prints its response. An error is
/// printed as an error response and also returned so the caller can exit
/// non-zero.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();

    match run_cli(cli) {
        Ok(data) => write_response(data),
        Err(e) => {
            log_event_with_fields(
                Event::CommandFailed,
                &[("code", e.code_str()), ("message", e.message())],
            );
            write_error(e.code_str(), e.message())?;
            Err(e)
        }
    }
}

fn run_cli(cli: Cli) -> CliResult<Value> {
    let config = resolve_config(&cli)?;
    Logger::set_min_severity(config.log_severity()?);

    let mut instance = Instance::open_with_config(&config, &cli.database)?;
    let path = config.database_path(&cli.database).display().to_string();
    log_event_with_fields(
        Event::DatabaseOpened,
        &[("database", instance.name()), ("path", path.as_str())],
    );
    for (name, err) in instance.unreadable_schemas() {
        let message = err.to_string();
        log_event_with_fields(
            Event::SchemaUnreadable,
            &[("code", err.code()), ("message", message.as_str()), ("schema", name)],
        );
    }

    run_command(&mut instance, cli.command)
}

/// Builds the effective configuration: file (if given), then flag overrides.
pub fn resolve_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::load(path)?;
            let path = path.display().to_string();
            log_event_with_fields(Event::ConfigLoaded, &[("path", path.as_str())]);
            config
        }
        None => Config::default(),
    };

    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
        config.log_severity()?;
    }

    Ok(config)
}

/// Run one command against an open database, returning the response data
pub fn run_command(instance: &mut Instance, cmd: Command) -> CliResult<Value> {
    match cmd {
        Command::CreateSchema { name, spec } => create_schema(instance, &name, &spec),
        Command::DropSchema { name } => drop_schema(instance, &name),
        Command::DisplaySchema { name } => display_schema(instance, &name),
        Command::ListSchemas => Ok(json!({ "schemas": instance.schema_names() })),
        Command::LoadCache { schemas, ids } => load_cache(instance, &schemas, &ids),
        Command::Insert {
            schema,
            id,
            payload,
        } => insert(instance, &schema, &id, &payload),
        Command::Select { schema, id } => select(instance, &schema, &id),
    }
}

fn describe(schema: &Schema) -> CliResult<Value> {
    Ok(json!({
        "schema": schema.name(),
        "created_at": schema.created_at().to_rfc3339(),
        "fields": serde_json::to_value(schema.fields())?,
    }))
}

fn create_schema(instance: &mut Instance, name: &str, spec: &[String]) -> CliResult<Value> {
    let schema = instance.add_schema(name, &spec.join(" "))?;
    let fields = schema.fields().len().to_string();
    log_event_with_fields(
        Event::SchemaCreated,
        &[("fields", fields.as_str()), ("schema", name)],
    );

    describe(schema)
}

fn drop_schema(instance: &mut Instance, name: &str) -> CliResult<Value> {
    instance.drop_schema(name)?;
    log_event_with_fields(Event::SchemaDropped, &[("schema", name)]);

    Ok(json!({ "dropped": name }))
}

fn display_schema(instance: &Instance, name: &str) -> CliResult<Value> {
    describe(instance.schema(name)?)
}

/// Loads the named schemas (all when none are named).
///
/// Each schema gets its own entry: a load summary, or an `error` object when
/// that schema could not be loaded. One bad name never stops the rest.
fn load_cache(instance: &mut Instance, schemas: &[String], ids: &[String]) -> CliResult<Value> {
    let outcomes: Vec<(String, PeanutsResult<LoadReport>)> = if schemas.is_empty() {
        instance
            .load_all_caches()?
            .into_iter()
            .map(|(name, report)| (name, Ok(report)))
            .collect()
    } else {
        let selected = if ids.is_empty() { None } else { Some(ids) };
        schemas
            .iter()
            .map(|name| (name.clone(), instance.load_cache(name, selected)))
            .collect()
    };

    let mut results = Vec::with_capacity(outcomes.len());
    for (name, outcome) in &outcomes {
        let report = match outcome {
            Ok(report) => report,
            Err(e) => {
                log_event_with_fields(
                    Event::CacheLoadFailed,
                    &[("code", e.code()), ("schema", name.as_str())],
                );
                results.push(json!({
                    "schema": name,
                    "error": { "code": e.code(), "message": e.to_string() },
                }));
                continue;
            }
        };

        for id in &report.missing {
            log_event_with_fields(
                Event::CacheLoadMiss,
                &[("id", id.as_str()), ("schema", name.as_str())],
            );
        }
        for failure in &report.failed {
            log_event_with_fields(
                Event::CacheLoadFailed,
                &[
                    ("code", failure.error.code()),
                    ("id", failure.id.as_str()),
                    ("schema", name.as_str()),
                ],
            );
        }
        let loaded = report.loaded.len().to_string();
        log_event_with_fields(
            Event::CacheLoaded,
            &[("loaded", loaded.as_str()), ("schema", name.as_str())],
        );

        let mut entry = serde_json::to_value(report.summary())?;
        if let Value::Object(map) = &mut entry {
            map.insert("schema".to_string(), json!(name));
        }
        results.push(entry);
    }

    Ok(json!({ "schemas": results }))
}

fn insert(instance: &mut Instance, schema: &str, id: &str, payload: &[String]) -> CliResult<Value> {
    if payload.is_empty() {
        return Err(CliError::invalid_arguments("insert needs a payload"));
    }

    let raw = RawRecord::parse(&payload.join(" ")).map_err(PeanutsError::from)?;
    let record = match instance.write(schema, id, raw) {
        Ok(record) => record,
        Err(e) => {
            if matches!(e, PeanutsError::Schema(_)) {
                log_event_with_fields(
                    Event::RecordRejected,
                    &[("code", e.code()), ("id", id), ("schema", schema)],
                );
            }
            return Err(e.into());
        }
    };
    log_event_with_fields(Event::RecordWritten, &[("id", id), ("schema", schema)]);

    Ok(json!({ "schema": schema, "id": id, "record": Value::from(record) }))
}

fn select(instance: &mut Instance, schema: &str, id: &str) -> CliResult<Value> {
    let record = instance.read(schema, id)?;
    log_event_with_fields(Event::RecordRead, &[("id", id), ("schema", schema)]);

    Ok(json!({ "schema": schema, "id": id, "record": Value::from(record) }))
}
