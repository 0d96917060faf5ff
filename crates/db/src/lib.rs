//! SQLite access for Shelf.
//!
//! A [`Database`] owns a single connection guarded by a mutex. All work goes
//! through [`Database::transaction`], which runs a closure on the blocking
//! pool with an explicit [`Transaction`] handle and commits only when the
//! closure succeeds.

use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

use rusqlite::{Connection, OptionalExtension};
use thiserror::Error;

use shelf_kernel::Migration;

pub use rusqlite::Transaction;

const MEMORY_PATH: &str = ":memory:";

/// Errors raised by the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A primary key or unique constraint rejected the write.
    #[error("uniqueness violation: {0}")]
    UniquenessViolation(String),

    #[error(transparent)]
    Sqlite(rusqlite::Error),

    #[error("database task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("failed to prepare database directory: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, message)
                if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                StoreError::UniquenessViolation(
                    message.clone().unwrap_or_else(|| code.to_string()),
                )
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Shared handle to the application database.
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the database at `path`. `:memory:` yields a private
    /// in-memory database. Missing parent directories are created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if path == Path::new(MEMORY_PATH) {
            return Self::open_in_memory();
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "database opened");
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        tracing::debug!("in-memory database opened");
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Run `work` inside one transaction.
    ///
    /// The transaction commits when `work` returns `Ok` and is rolled back
    /// when it returns `Err`; the error is handed back unchanged.
    pub async fn transaction<T, E, F>(&self, work: F) -> Result<T, E>
    where
        F: FnOnce(&Transaction<'_>) -> Result<T, E> + Send + 'static,
        T: Send + 'static,
        E: From<StoreError> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let task = tokio::task::spawn_blocking(move || -> Result<T, E> {
            // A panicking closure already rolled its transaction back, so the
            // connection behind a poisoned lock is still consistent.
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            let tx = guard.transaction().map_err(StoreError::from)?;
            // Dropping `tx` without commit rolls back.
            let value = work(&tx)?;
            tx.commit().map_err(StoreError::from)?;
            Ok(value)
        });

        match task.await {
            Ok(result) => result,
            Err(join_error) => Err(StoreError::from(join_error).into()),
        }
    }

    /// Apply every migration that has not been recorded yet, in the given
    /// order. Returns how many were applied.
    pub async fn apply_migrations(
        &self,
        migrations: Vec<(String, Migration)>,
    ) -> Result<usize, StoreError> {
        self.transaction(move |tx| {
            ensure_ledger(tx)?;
            let mut applied = 0;
            for (module, migration) in &migrations {
                if is_applied(tx, module, migration.id)? {
                    continue;
                }
                tx.execute_batch(migration.up)?;
                tx.execute(
                    "INSERT INTO schema_migrations (module, id) VALUES (?1, ?2)",
                    (module, migration.id),
                )?;
                tracing::info!(module = %module, migration = migration.id, "migration applied");
                applied += 1;
            }
            Ok(applied)
        })
        .await
    }

    /// Revert applied migrations in reverse order. Returns how many were
    /// reverted.
    pub async fn revert_migrations(
        &self,
        migrations: Vec<(String, Migration)>,
    ) -> Result<usize, StoreError> {
        self.transaction(move |tx| {
            ensure_ledger(tx)?;
            let mut reverted = 0;
            for (module, migration) in migrations.iter().rev() {
                if !is_applied(tx, module, migration.id)? {
                    continue;
                }
                tx.execute_batch(migration.down)?;
                tx.execute(
                    "DELETE FROM schema_migrations WHERE module = ?1 AND id = ?2",
                    (module, migration.id),
                )?;
                tracing::info!(module = %module, migration = migration.id, "migration reverted");
                reverted += 1;
            }
            Ok(reverted)
        })
        .await
    }
}

fn ensure_ledger(tx: &Transaction<'_>) -> Result<(), StoreError> {
    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            module TEXT NOT NULL,
            id TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            PRIMARY KEY (module, id)
        );",
    )?;
    Ok(())
}

fn is_applied(tx: &Transaction<'_>, module: &str, id: &str) -> Result<bool, StoreError> {
    let found = tx
        .query_row(
            "SELECT 1 FROM schema_migrations WHERE module = ?1 AND id = ?2",
            (module, id),
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn migrations() -> Vec<(String, Migration)> {
        vec![(
            "widgets".to_string(),
            Migration {
                id: "001_init",
                up: "CREATE TABLE widget (id INTEGER PRIMARY KEY, name TEXT);",
                down: "DROP TABLE widget;",
            },
        )]
    }

    async fn count_widgets(db: &Database) -> Result<i64, StoreError> {
        db.transaction(|tx| {
            Ok(tx.query_row("SELECT COUNT(*) FROM widget", [], |row| row.get(0))?)
        })
        .await
    }

    #[tokio::test]
    async fn migrations_apply_once() {
        let db = Database::open_in_memory().unwrap();

        assert_eq!(db.apply_migrations(migrations()).await.unwrap(), 1);
        assert_eq!(db.apply_migrations(migrations()).await.unwrap(), 0);
        assert_eq!(count_widgets(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn revert_drops_tables_and_allows_reapply() {
        let db = Database::open_in_memory().unwrap();
        db.apply_migrations(migrations()).await.unwrap();

        assert_eq!(db.revert_migrations(migrations()).await.unwrap(), 1);
        assert!(count_widgets(&db).await.is_err());
        assert_eq!(db.revert_migrations(migrations()).await.unwrap(), 0);

        assert_eq!(db.apply_migrations(migrations()).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_closure_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        db.apply_migrations(migrations()).await.unwrap();

        let result: Result<(), StoreError> = db
            .transaction(|tx| {
                tx.execute("INSERT INTO widget (id, name) VALUES (1, 'a')", [])?;
                tx.execute("INSERT INTO widget (id, name) VALUES (1, 'b')", [])?;
                Ok(())
            })
            .await;

        assert!(matches!(result, Err(StoreError::UniquenessViolation(_))));
        assert_eq!(count_widgets(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn panicking_closure_does_not_wedge_the_connection() {
        let db = Database::open_in_memory().unwrap();
        db.apply_migrations(migrations()).await.unwrap();

        let result: Result<(), StoreError> = db
            .transaction(|tx| {
                tx.execute("INSERT INTO widget (name) VALUES ('lost')", [])?;
                panic!("closure failed mid-transaction");
            })
            .await;

        assert!(matches!(result, Err(StoreError::Task(_))));
        assert_eq!(count_widgets(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn file_database_persists_between_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shelf.db");

        {
            let db = Database::open(&path).unwrap();
            db.apply_migrations(migrations()).await.unwrap();
            db.transaction(|tx| {
                tx.execute("INSERT INTO widget (name) VALUES ('kept')", [])?;
                Ok::<_, StoreError>(())
            })
            .await
            .unwrap();
        }

        let reopened = Database::open(&path).unwrap();
        assert_eq!(count_widgets(&reopened).await.unwrap(), 1);
    }
}
