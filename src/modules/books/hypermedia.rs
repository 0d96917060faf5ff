//! Library-specific Mason controls and the documents built from them.

use axum::http::Method;
use serde::{Deserialize, Serialize};
use shelf_mason::{ControlAttributes, MasonDocument, NoBody};

use super::models::Book;
use super::routes::{item_path, COLLECTION_PATH};
use super::schema::book_schema;

/// Prefix of the library link relations.
pub const LIBRARY_NAMESPACE: &str = "library";
/// Where the library link relations are documented.
pub const LIBRARY_NAMESPACE_URI: &str = "/api/";

/// Body of the collection document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCollection {
    pub items: Vec<MasonDocument<Book>>,
}

/// Book controls with fixed semantics, available on any document.
pub trait LibraryControls {
    fn add_library_namespace(&mut self) -> &mut Self;
    fn add_control_get_books(&mut self) -> &mut Self;
    fn add_control_add_book(&mut self) -> &mut Self;
    fn add_control_edit_book(&mut self, book_id: i64) -> &mut Self;
    fn add_control_delete_book(&mut self, book_id: i64) -> &mut Self;
}

impl<T> LibraryControls for MasonDocument<T> {
    fn add_library_namespace(&mut self) -> &mut Self {
        self.add_namespace(LIBRARY_NAMESPACE, LIBRARY_NAMESPACE_URI)
    }

    fn add_control_get_books(&mut self) -> &mut Self {
        self.add_control(
            "library:books-all",
            COLLECTION_PATH,
            ControlAttributes::new()
                .method(Method::GET)
                .title("Get all books in the database"),
        )
    }

    fn add_control_add_book(&mut self) -> &mut Self {
        self.add_control(
            "library:add-book",
            COLLECTION_PATH,
            ControlAttributes::new()
                .method(Method::POST)
                .encoding("json")
                .title("Add a new book")
                .schema(book_schema().clone()),
        )
    }

    fn add_control_edit_book(&mut self, book_id: i64) -> &mut Self {
        self.add_control(
            "edit",
            item_path(book_id),
            ControlAttributes::new()
                .method(Method::PUT)
                .encoding("json")
                .title("Edit this book")
                .schema(book_schema().clone()),
        )
    }

    fn add_control_delete_book(&mut self, book_id: i64) -> &mut Self {
        self.add_control(
            "library:delete",
            item_path(book_id),
            ControlAttributes::new()
                .method(Method::DELETE)
                .title("Delete this book"),
        )
    }
}

/// API entry point: where to find the books.
pub fn entry_document() -> MasonDocument<NoBody> {
    let mut document = MasonDocument::empty();
    document.add_library_namespace().add_control_get_books();
    document
}

/// A book as it appears inside the collection's `items`.
pub fn collection_item(book: Book) -> MasonDocument<Book> {
    let book_id = book.book_id;
    let mut document = MasonDocument::new(book);
    document
        .add_control("self", item_path(book_id), ControlAttributes::new())
        .add_control_edit_book(book_id)
        .add_control_delete_book(book_id);
    document
}

pub fn collection_document(books: Vec<Book>) -> MasonDocument<BookCollection> {
    let items = books.into_iter().map(collection_item).collect();
    let mut document = MasonDocument::new(BookCollection { items });
    document
        .add_library_namespace()
        .add_control("self", COLLECTION_PATH, ControlAttributes::new())
        .add_control_add_book();
    document
}

/// Standalone item document served by `GET /api/books/{id}/`.
pub fn book_document(book: Book) -> MasonDocument<Book> {
    let book_id = book.book_id;
    let mut document = MasonDocument::new(book);
    document
        .add_library_namespace()
        .add_control("self", item_path(book_id), ControlAttributes::new())
        .add_control("collection", COLLECTION_PATH, ControlAttributes::new())
        .add_control_edit_book(book_id)
        .add_control_delete_book(book_id);
    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn book() -> Book {
        Book {
            book_id: 2,
            title: Some("Lord of the Rings".to_string()),
            author: Some("J. R. R. Tolkien".to_string()),
            description: None,
        }
    }

    #[test]
    fn entry_points_at_collection() {
        let value = serde_json::to_value(entry_document()).unwrap();
        assert_eq!(
            value,
            json!({
                "@namespaces": {"library": {"name": "/api/"}},
                "@controls": {
                    "library:books-all": {
                        "href": "/api/books/",
                        "method": "GET",
                        "title": "Get all books in the database"
                    }
                }
            })
        );
    }

    #[test]
    fn book_document_merges_fields_and_controls() {
        let value = serde_json::to_value(book_document(book())).unwrap();

        assert_eq!(value["book_id"], 2);
        assert_eq!(value["title"], "Lord of the Rings");
        assert_eq!(value["description"], json!(null));
        assert!(value.get("@error").is_none());

        let controls = &value["@controls"];
        assert_eq!(controls["self"], json!({"href": "/api/books/2/"}));
        assert_eq!(controls["collection"], json!({"href": "/api/books/"}));
        assert_eq!(controls["edit"]["method"], "PUT");
        assert_eq!(controls["edit"]["encoding"], "json");
        assert_eq!(controls["edit"]["schema"], *book_schema());
        assert_eq!(
            controls["library:delete"],
            json!({
                "href": "/api/books/2/",
                "method": "DELETE",
                "title": "Delete this book"
            })
        );
    }

    #[test]
    fn collection_lists_items_with_their_own_controls() {
        let document = collection_document(vec![book()]);
        let add = document.control("library:add-book").unwrap();
        assert_eq!(add.method.as_deref(), Some("POST"));
        assert_eq!(add.schema.as_ref(), Some(book_schema()));

        let items = &document.body().items;
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert!(item.namespaces().is_empty());
        assert_eq!(
            item.controls().keys().collect::<Vec<_>>(),
            vec!["edit", "library:delete", "self"]
        );
    }

    #[test]
    fn empty_collection_still_offers_add_book() {
        let value = serde_json::to_value(collection_document(Vec::new())).unwrap();
        assert_eq!(value["items"], json!([]));
        assert_eq!(value["@controls"]["self"]["href"], "/api/books/");
        assert!(value["@controls"].get("library:add-book").is_some());
    }
}
