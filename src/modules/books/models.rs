use serde::{Deserialize, Serialize};

/// A stored book. Every column except the id is nullable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier, never reused
    pub book_id: i64,
    /// Title of the book
    pub title: Option<String>,
    /// Author of the book
    pub author: Option<String>,
    /// Description of the book
    pub description: Option<String>,
}

/// Writable fields of a book.
///
/// Request payloads decode into this type after schema validation; a
/// `book_id` in the payload is ignored because the store owns ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookFields {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookFields {
    pub fn new(title: &str, author: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            author: Some(author.to_string()),
            description: Some(description.to_string()),
        }
    }

    pub fn into_book(self, book_id: i64) -> Book {
        Book {
            book_id,
            title: self.title,
            author: self.author,
            description: self.description,
        }
    }
}
