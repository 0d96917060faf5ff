use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header::LOCATION, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use shelf_http::{payload::JsonObject, AppError, ErrorResponse, Mason};

use super::{book_fields, book_not_found, item_path, parse_book_id, BooksState};
use crate::modules::books::hypermedia::book_document;
use crate::modules::books::models::Book;
use crate::modules::books::store;

/// `GET /api/books/{book_id}/`
pub async fn get_book(
    State(state): State<BooksState>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<Mason<Book>, ErrorResponse> {
    let book_id = parse_book_id(&raw_id).map_err(|err| err.at(uri.path()))?;

    let book = state
        .db
        .transaction(move |tx| store::find(tx, book_id))
        .await
        .map_err(|err| AppError::from(err).at(uri.path()))?
        .ok_or_else(|| book_not_found(&raw_id).at(uri.path()))?;

    Ok(Mason::ok(book_document(book)))
}

/// `PUT /api/books/{book_id}/`
///
/// Existence is checked before the body is looked at, so an unknown id
/// answers 404 whatever the payload.
pub async fn update_book(
    State(state): State<BooksState>,
    Path(raw_id): Path<String>,
    uri: Uri,
    body: JsonObject,
) -> Result<Response, ErrorResponse> {
    let book_id = parse_book_id(&raw_id).map_err(|err| err.at(uri.path()))?;
    let validator = Arc::clone(&state.validator);

    state
        .db
        .transaction(move |tx| -> Result<(), AppError> {
            if store::find(tx, book_id)?.is_none() {
                return Err(book_not_found(&raw_id));
            }
            let fields = book_fields(&validator, body)?;
            store::update(tx, book_id, &fields)?;
            Ok(())
        })
        .await
        .map_err(|err| err.at(uri.path()))?;

    tracing::info!(book_id, "book updated");
    Ok((StatusCode::NO_CONTENT, [(LOCATION, item_path(book_id))]).into_response())
}

/// `DELETE /api/books/{book_id}/`
pub async fn delete_book(
    State(state): State<BooksState>,
    Path(raw_id): Path<String>,
    uri: Uri,
) -> Result<StatusCode, ErrorResponse> {
    let book_id = parse_book_id(&raw_id).map_err(|err| err.at(uri.path()))?;

    state
        .db
        .transaction(move |tx| -> Result<(), AppError> {
            if store::delete(tx, book_id)? {
                Ok(())
            } else {
                Err(book_not_found(&raw_id))
            }
        })
        .await
        .map_err(|err| err.at(uri.path()))?;

    tracing::info!(book_id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}
