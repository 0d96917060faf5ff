//! Sample data for development databases.

use shelf_db::{Database, StoreError};

use super::models::BookFields;
use super::store;

fn initial_books() -> Vec<BookFields> {
    vec![
        BookFields::new(
            "Harry Potter and the Philosopher's Stone",
            "J. K. Rowling",
            "Young wizard with a bad-ass scar fights against a bad guy with a weird nose.",
        ),
        BookFields::new(
            "Lord of the Rings",
            "J. R. R. Tolkien",
            "Young hobbit gets a cool ring but he has to throw it in a volcano because there's a bad guy who is actually just a tower.",
        ),
        BookFields::new(
            "The Lion, the Witch and the Wardrobe",
            "C. S. Lewis",
            "Seven kids go inside their wardrobe to talk to animals and fight against an evil witch.",
        ),
    ]
}

/// Insert the sample books in one transaction and return their ids.
pub async fn insert_initial_data(db: &Database) -> Result<Vec<i64>, StoreError> {
    let ids = db
        .transaction(|tx| {
            initial_books()
                .iter()
                .map(|fields| store::insert(tx, None, fields))
                .collect::<Result<Vec<_>, _>>()
        })
        .await?;

    tracing::info!(count = ids.len(), "sample books inserted");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeds_three_books() {
        let db = Database::open_in_memory().unwrap();
        db.apply_migrations(
            store::migrations()
                .into_iter()
                .map(|migration| ("books".to_string(), migration))
                .collect(),
        )
        .await
        .unwrap();

        assert_eq!(insert_initial_data(&db).await.unwrap(), vec![1, 2, 3]);

        let books = db.transaction(|tx| store::all(tx)).await.unwrap();
        assert_eq!(
            books[1].title.as_deref(),
            Some("Lord of the Rings")
        );
    }
}
