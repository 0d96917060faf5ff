use async_trait::async_trait;
use axum::{routing::get, Router};
use shelf_http::Mason;
use shelf_kernel::Module;
use shelf_mason::NoBody;

use super::books::hypermedia::entry_document;

pub const ENTRY_PATH: &str = "/api/";

/// API entry point module
pub struct EntryModule;

impl EntryModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for EntryModule {
    fn name(&self) -> &'static str {
        "entry"
    }

    fn routes(&self) -> Router {
        Router::new().route(ENTRY_PATH, get(entry))
    }
}

/// `GET /api/`
async fn entry() -> Mason<NoBody> {
    Mason::ok(entry_document())
}

/// Create a new instance of the entry module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(EntryModule::new())
}
