//! JSON Schema for book payloads.

use anyhow::anyhow;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use shelf_http::AppError;

static BOOK_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "object",
        "required": ["title"],
        "properties": {
            "book_id": {
                "description": "Identifier of the book",
                "type": "integer"
            },
            "title": {
                "description": "Title of the book",
                "type": "string"
            },
            "author": {
                "description": "Author of the book",
                "type": "string"
            },
            "description": {
                "description": "Description of the book",
                "type": "string"
            }
        }
    })
});

/// Schema every POST/PUT body must satisfy. Also advertised in the `schema`
/// of write controls.
pub fn book_schema() -> &'static Value {
    &BOOK_SCHEMA
}

/// [`book_schema`] compiled once for request validation.
pub struct BookValidator {
    validator: jsonschema::Validator,
}

impl BookValidator {
    pub fn new() -> anyhow::Result<Self> {
        let validator = jsonschema::validator_for(book_schema())
            .map_err(|err| anyhow!("book schema failed to compile: {err}"))?;
        Ok(Self { validator })
    }

    /// Check `payload`; every violation is reported in the error detail.
    pub fn validate(&self, payload: &Value) -> Result<(), AppError> {
        let violations: Vec<String> = self
            .validator
            .iter_errors(payload)
            .map(|err| err.to_string())
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(violations.join("; ")))
        }
    }
}
