//! JSON output for the CLI
//!
//! - One response per invocation, one line, on stdout
//! - `{"status":"ok","data":...}` or `{"status":"error","code":...,"message":...}`
//! - UTF-8 only

use std::io::{self, Write};

use serde_json::{json, Value};

use super::errors::CliResult;

pub fn ok_response(data: Value) -> Value {
    json!({
        "status": "ok",
        "data": data
    })
}

pub fn error_response(code: &str, message: &str) -> Value {
    json!({
        "status": "error",
        "code": code,
        "message": message
    })
}

/// Write a success response to stdout
pub fn write_response(data: Value) -> CliResult<()> {
    write_line(&mut io::stdout(), &ok_response(data))
}

/// Write an error response to stdout
pub fn write_error(code: &str, message: &str) -> CliResult<()> {
    write_line(&mut io::stdout(), &error_response(code, message))
}

fn write_line<W: Write>(writer: &mut W, response: &Value) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
