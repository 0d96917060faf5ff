pub mod hypermedia;
pub mod models;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use shelf_db::Database;
use shelf_kernel::{InitCtx, Migration, Module};

use routes::BooksState;
use schema::BookValidator;

/// Books module: the `/api/books/` collection and its items
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(db: Database) -> anyhow::Result<Self> {
        let validator = BookValidator::new().context("failed to prepare book validator")?;
        Ok(Self {
            state: BooksState {
                db,
                validator: Arc::new(validator),
            },
        })
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        store::migrations()
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let books = self
            .state
            .db
            .transaction(|tx| store::count(tx))
            .await
            .context("books table is not available; run `shelf-cli init-db`")?;
        tracing::info!(module = self.name(), books, "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(db: Database) -> anyhow::Result<Arc<dyn Module>> {
    Ok(Arc::new(BooksModule::new(db)?))
}
