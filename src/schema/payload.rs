//! Raw write payloads as handed over by a front end
//!
//! Two forms are accepted:
//!
//! - flat `key=value` text, where values are raw text. STRING fields take the
//!   text verbatim; every other declared type decodes it as a JSON literal.
//! - a structured JSON object, whose values are already typed.

use serde_json::{Map, Value};

use super::errors::{SchemaError, SchemaResult};

/// A single unvalidated field value
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    /// Raw text typed by a user
    Text(String),
    /// Already-structured value
    Json(Value),
}

impl RawValue {
    /// Converts to a JSON value without any type enforcement.
    pub fn into_untyped(self) -> Value {
        match self {
            RawValue::Text(text) => Value::String(text),
            RawValue::Json(value) => value,
        }
    }
}

/// An ordered list of unvalidated (field, value) pairs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    entries: Vec<(String, RawValue)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, value: RawValue) {
        self.entries.push((field.into(), value));
    }

    /// Builder form of [`RawRecord::push`] for raw text values.
    pub fn with_text(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(field, RawValue::Text(text.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, RawValue)> {
        self.entries.iter()
    }

    /// Parses either form: text starting with `{` is a JSON object, anything
    /// else is `key=value` pairs.
    pub fn parse(input: &str) -> SchemaResult<Self> {
        if input.trim_start().starts_with('{') {
            Self::from_json_str(input)
        } else {
            Self::from_pairs(input)
        }
    }

    /// Parses a JSON object.
    pub fn from_json_str(input: &str) -> SchemaResult<Self> {
        let value: Value = serde_json::from_str(input)
            .map_err(|e| SchemaError::MalformedInput(format!("invalid JSON payload: {}", e)))?;

        match value {
            Value::Object(map) => Ok(Self::from(map)),
            _ => Err(SchemaError::MalformedInput(
                "payload must be a JSON object".into(),
            )),
        }
    }

    /// Parses whitespace-separated `key=value` tokens.
    ///
    /// A token containing `=` starts a new pair; a token without one continues
    /// the previous value, re-joined with a single space. This keeps values
    /// such as `tags=["a", "b"]` or `name=Ann Lee` intact after splitting.
    pub fn from_pairs(input: &str) -> SchemaResult<Self> {
        let mut entries: Vec<(String, String)> = Vec::new();

        for token in input.split_whitespace() {
            match token.split_once('=') {
                Some((key, value)) => {
                    if key.is_empty() {
                        return Err(SchemaError::MalformedInput(format!(
                            "missing field name in '{}'",
                            token
                        )));
                    }
                    entries.push((key.to_string(), value.to_string()));
                }
                None => match entries.last_mut() {
                    Some((_, value)) => {
                        value.push(' ');
                        value.push_str(token);
                    }
                    None => {
                        return Err(SchemaError::MalformedInput(format!(
                            "expected key=value, got '{}'",
                            token
                        )))
                    }
                },
            }
        }

        Ok(Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k, RawValue::Text(v)))
                .collect(),
        })
    }
}

impl From<Map<String, Value>> for RawRecord {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map
                .into_iter()
                .map(|(k, v)| (k, RawValue::Json(v)))
                .collect(),
        }
    }
}

impl IntoIterator for RawRecord {
    type Item = (String, RawValue);
    type IntoIter = std::vec::IntoIter<(String, RawValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
