//! Mason response type for Axum handlers

use axum::{
    http::{header::CONTENT_TYPE, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use shelf_mason::{MasonDocument, MASON_MEDIA_TYPE};

/// A Mason document served with a status code and
/// `Content-Type: application/vnd.mason+json`.
#[derive(Debug)]
pub struct Mason<T> {
    status: StatusCode,
    document: MasonDocument<T>,
}

impl<T> Mason<T> {
    pub fn new(status: StatusCode, document: MasonDocument<T>) -> Self {
        Self { status, document }
    }

    pub fn ok(document: MasonDocument<T>) -> Self {
        Self::new(StatusCode::OK, document)
    }
}

impl<T: Serialize> IntoResponse for Mason<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec_pretty(&self.document) {
            Ok(bytes) => (
                self.status,
                [(CONTENT_TYPE, HeaderValue::from_static(MASON_MEDIA_TYPE))],
                bytes,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize Mason document");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_mason::ControlAttributes;

    #[tokio::test]
    async fn serves_document_with_mason_content_type() {
        let mut document = MasonDocument::empty();
        document.add_control("self", "/api/", ControlAttributes::new());

        let response = Mason::ok(document).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/vnd.mason+json"
        );

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["@controls"]["self"]["href"], "/api/");
    }
}
