use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use shelf_http::{payload::JsonObject, AppError, ErrorResponse, Mason};

use super::{book_fields, item_path, BooksState};
use crate::modules::books::hypermedia::{collection_document, BookCollection};
use crate::modules::books::store;

/// `GET /api/books/`
pub async fn list_books(
    State(state): State<BooksState>,
    uri: Uri,
) -> Result<Mason<BookCollection>, ErrorResponse> {
    let books = state
        .db
        .transaction(|tx| store::all(tx))
        .await
        .map_err(|err| AppError::from(err).at(uri.path()))?;

    Ok(Mason::ok(collection_document(books)))
}

/// `POST /api/books/`
pub async fn create_book(
    State(state): State<BooksState>,
    uri: Uri,
    body: JsonObject,
) -> Result<Response, ErrorResponse> {
    let fields = book_fields(&state.validator, body).map_err(|err| err.at(uri.path()))?;

    let book_id = state
        .db
        .transaction(move |tx| store::insert(tx, None, &fields))
        .await
        .map_err(|err| AppError::from(err).at(uri.path()))?;

    tracing::info!(book_id, "book created");
    Ok((StatusCode::CREATED, [(LOCATION, item_path(book_id))]).into_response())
}
