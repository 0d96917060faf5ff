//! HTTP surface of the books module.

mod collection;
mod item;

use std::sync::Arc;

use axum::{routing::get, Router};
use serde_json::Value;
use shelf_db::Database;
use shelf_http::payload::{self, JsonObject};
use shelf_http::AppError;

use super::models::BookFields;
use super::schema::BookValidator;

pub const COLLECTION_PATH: &str = "/api/books/";
const ITEM_ROUTE: &str = "/api/books/{book_id}/";

/// URL of a single book.
pub fn item_path(book_id: i64) -> String {
    format!("{COLLECTION_PATH}{book_id}/")
}

/// Shared by every books handler.
#[derive(Clone)]
pub struct BooksState {
    pub db: Database,
    pub validator: Arc<BookValidator>,
}

pub fn router(state: BooksState) -> Router {
    Router::new()
        .route(
            COLLECTION_PATH,
            get(collection::list_books).post(collection::create_book),
        )
        .route(
            ITEM_ROUTE,
            get(item::get_book)
                .put(item::update_book)
                .delete(item::delete_book),
        )
        .with_state(state)
}

/// Decode and validate a write payload.
fn book_fields(validator: &BookValidator, body: JsonObject) -> Result<BookFields, AppError> {
    let payload = Value::Object(payload::json_object(body)?);
    validator.validate(&payload)?;
    serde_json::from_value(payload).map_err(|err| AppError::validation(err.to_string()))
}

fn book_not_found(book_id: &str) -> AppError {
    AppError::not_found(format!("No book was found with the id '{book_id}'"))
}

/// Only the canonical spelling of an id (plain digits, no sign, no leading
/// zeros) names a book, so each book has exactly one URL.
fn parse_book_id(raw: &str) -> Result<i64, AppError> {
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && !(raw.len() > 1 && raw.starts_with('0'));
    if !canonical {
        return Err(book_not_found(raw));
    }
    raw.parse().map_err(|_| book_not_found(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_path_has_trailing_slash() {
        assert_eq!(item_path(4), "/api/books/4/");
    }

    #[test]
    fn non_numeric_id_is_not_found() {
        assert!(matches!(
            parse_book_id("abc"),
            Err(AppError::NotFound { detail }) if detail == "No book was found with the id 'abc'"
        ));
        assert_eq!(parse_book_id("12").unwrap(), 12);
    }

    #[test]
    fn non_canonical_ids_are_not_found() {
        for raw in ["+1", "01", "-1", " 1", "", "99999999999999999999"] {
            assert!(
                matches!(parse_book_id(raw), Err(AppError::NotFound { .. })),
                "{raw:?} should not name a book"
            );
        }
        assert_eq!(parse_book_id("0").unwrap(), 0);
    }
}
