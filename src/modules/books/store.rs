//! Book persistence. Every function works on a caller-owned transaction.

use rusqlite::{OptionalExtension, Row};
use shelf_db::{StoreError, Transaction};
use shelf_kernel::Migration;

use super::models::{Book, BookFields};

pub fn migrations() -> Vec<Migration> {
    vec![Migration {
        id: "001_create_book",
        // AUTOINCREMENT keeps deleted ids from being handed out again
        up: "CREATE TABLE IF NOT EXISTS book (
                book_id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT,
                author TEXT,
                description TEXT
            );",
        down: "DROP TABLE IF EXISTS book;",
    }]
}

fn book_from_row(row: &Row<'_>) -> rusqlite::Result<Book> {
    Ok(Book {
        book_id: row.get("book_id")?,
        title: row.get("title")?,
        author: row.get("author")?,
        description: row.get("description")?,
    })
}

/// Every book, in insertion order.
pub fn all(tx: &Transaction<'_>) -> Result<Vec<Book>, StoreError> {
    let mut statement =
        tx.prepare("SELECT book_id, title, author, description FROM book ORDER BY book_id")?;
    let books = statement
        .query_map([], book_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(books)
}

pub fn find(tx: &Transaction<'_>, book_id: i64) -> Result<Option<Book>, StoreError> {
    let book = tx
        .query_row(
            "SELECT book_id, title, author, description FROM book WHERE book_id = ?1",
            [book_id],
            book_from_row,
        )
        .optional()?;
    Ok(book)
}

pub fn count(tx: &Transaction<'_>) -> Result<i64, StoreError> {
    Ok(tx.query_row("SELECT COUNT(*) FROM book", [], |row| row.get(0))?)
}

/// Insert a book and return its id. With `book_id: None` the store assigns
/// the next id; an explicit id that already exists is a
/// [`StoreError::UniquenessViolation`].
pub fn insert(
    tx: &Transaction<'_>,
    book_id: Option<i64>,
    fields: &BookFields,
) -> Result<i64, StoreError> {
    tx.execute(
        "INSERT INTO book (book_id, title, author, description) VALUES (?1, ?2, ?3, ?4)",
        (book_id, &fields.title, &fields.author, &fields.description),
    )?;
    Ok(tx.last_insert_rowid())
}

/// Overwrite all writable fields. Returns `false` when no such book exists.
pub fn update(tx: &Transaction<'_>, book_id: i64, fields: &BookFields) -> Result<bool, StoreError> {
    let changed = tx.execute(
        "UPDATE book SET title = ?2, author = ?3, description = ?4 WHERE book_id = ?1",
        (book_id, &fields.title, &fields.author, &fields.description),
    )?;
    Ok(changed > 0)
}

/// Returns `false` when no such book exists.
pub fn delete(tx: &Transaction<'_>, book_id: i64) -> Result<bool, StoreError> {
    let changed = tx.execute("DELETE FROM book WHERE book_id = ?1", [book_id])?;
    Ok(changed > 0)
}
