//! Schema declaration parsing
//!
//! A declaration is whitespace-separated alternating `<field> <type>` tokens:
//!
//! ```text
//! name STRING age INTEGER tags ARRAY_STRING
//! ```

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDef, FieldType};

/// Parses a declaration string into ordered field definitions.
pub fn parse_declaration(spec: &str) -> SchemaResult<Vec<FieldDef>> {
    let tokens: Vec<&str> = spec.split_whitespace().collect();
    parse_declaration_tokens(&tokens)
}

/// Parses pre-split declaration tokens.
///
/// # Errors
///
/// `MalformedSchema` on an odd token count, an unrecognized type token, or a
/// field declared twice.
pub fn parse_declaration_tokens<S: AsRef<str>>(tokens: &[S]) -> SchemaResult<Vec<FieldDef>> {
    if tokens.len() % 2 != 0 {
        return Err(SchemaError::MalformedSchema(format!(
            "expected <field> <type> pairs, got {} tokens",
            tokens.len()
        )));
    }

    let mut fields: Vec<FieldDef> = Vec::with_capacity(tokens.len() / 2);
    for pair in tokens.chunks(2) {
        let name = pair[0].as_ref();
        let field_type: FieldType = pair[1].as_ref().parse()?;

        if fields.iter().any(|def| def.name == name) {
            return Err(SchemaError::MalformedSchema(format!(
                "field '{}' declared more than once",
                name
            )));
        }

        fields.push(FieldDef::new(name, field_type));
    }

    Ok(fields)
}
