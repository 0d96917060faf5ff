//! Error handling for the Shelf HTTP layer
//!
//! Handlers fail with an [`AppError`]; attaching the request path with
//! [`AppError::at`] yields an [`ErrorResponse`], which renders as a Mason
//! error document.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelf_db::StoreError;
use shelf_mason::MasonDocument;
use thiserror::Error;
use uuid::Uuid;

use crate::mason::Mason;

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Body absent or not a JSON object.
    #[error("unsupported media type")]
    UnsupportedMediaType,

    /// Payload does not satisfy the resource schema.
    #[error("validation error: {detail}")]
    Validation { detail: String },

    #[error("not found: {detail}")]
    NotFound { detail: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Create a validation error carrying the validator's message
    pub fn validation(detail: impl Into<String>) -> Self {
        Self::Validation {
            detail: detail.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::NotFound {
            detail: detail.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short title used as `@message`.
    pub fn title(&self) -> &'static str {
        match self {
            AppError::UnsupportedMediaType => "Unsupported media type",
            AppError::Validation { .. } => {
                "Invalid JSON document. Missing field or incorrect type."
            }
            AppError::NotFound { .. } => "Not found",
            AppError::Internal(_) => "Internal server error",
        }
    }

    /// Human-readable detail used as the single entry of `@messages`.
    pub fn detail(&self) -> String {
        match self {
            AppError::UnsupportedMediaType => "Requests must be JSON".to_string(),
            AppError::Validation { detail } | AppError::NotFound { detail } => detail.clone(),
            // Internal details stay in the logs of release builds
            AppError::Internal(_) if cfg!(not(debug_assertions)) => {
                "An internal server error occurred".to_string()
            }
            AppError::Internal(e) => format!("{e:#}"),
        }
    }

    /// Bind the error to the resource it was raised for.
    pub fn at(self, resource_url: impl Into<String>) -> ErrorResponse {
        ErrorResponse {
            resource_url: resource_url.into(),
            error: self,
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(anyhow::Error::new(err))
    }
}

/// An [`AppError`] together with the path of the failing resource.
#[derive(Debug)]
pub struct ErrorResponse {
    pub resource_url: String,
    pub error: AppError,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let error_id = Uuid::new_v4();
        let status = self.error.status();

        if status.is_server_error() {
            tracing::error!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                resource_url = %self.resource_url,
                error = %format!("{:#}", self.error),
                "Request error"
            );
        } else {
            tracing::info!(
                error_id = %error_id,
                status_code = %status.as_u16(),
                resource_url = %self.resource_url,
                error = %self.error,
                "Request rejected"
            );
        }

        let document =
            MasonDocument::error(self.resource_url, self.error.title(), self.error.detail());
        Mason::new(status, document).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::CONTENT_TYPE;
    use serde_json::{json, Value};
    use shelf_mason::MASON_MEDIA_TYPE;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::UnsupportedMediaType.status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
        assert_eq!(AppError::validation("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::not_found("x").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal(anyhow::anyhow!("Database connection failed")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_uniqueness_violation_is_internal() {
        let error = AppError::from(StoreError::UniquenessViolation("book.book_id".into()));
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_error_response_format() {
        let response = AppError::not_found("No book was found with the id '999'")
            .at("/api/books/999/")
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            MASON_MEDIA_TYPE
        );
        assert_eq!(
            body_json(response).await,
            json!({
                "resource_url": "/api/books/999/",
                "@error": {
                    "@message": "Not found",
                    "@messages": ["No book was found with the id '999'"]
                }
            })
        );
    }

    #[tokio::test]
    async fn test_unsupported_media_type_document() {
        let response = AppError::UnsupportedMediaType
            .at("/api/books/")
            .into_response();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = body_json(response).await;
        assert_eq!(body["@error"]["@message"], "Unsupported media type");
        assert_eq!(body["@error"]["@messages"][0], "Requests must be JSON");
    }
}
