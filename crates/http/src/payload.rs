//! JSON request bodies.
//!
//! Handlers take the extractor result instead of the bare [`Json`] so a
//! missing resource can still answer 404 before the body is looked at.

use axum::{extract::rejection::JsonRejection, Json};
use serde_json::{Map, Value};

use crate::error::AppError;

/// What write handlers extract: a JSON object, or the reason there is none.
pub type JsonObject = Result<Json<Map<String, Value>>, JsonRejection>;

/// Unwrap a JSON object body.
///
/// Any rejection (wrong content type, empty body, malformed JSON, or a JSON
/// value that is not an object) is an [`AppError::UnsupportedMediaType`].
pub fn json_object(payload: JsonObject) -> Result<Map<String, Value>, AppError> {
    match payload {
        Ok(Json(object)) => Ok(object),
        Err(rejection) => {
            tracing::debug!(reason = %rejection.body_text(), "request body rejected");
            Err(AppError::UnsupportedMediaType)
        }
    }
}
