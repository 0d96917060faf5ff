//! Shelf application library
//!
//! Application modules served by the Shelf HTTP stack: the API entry point
//! and the books resource.

pub mod modules;

use shelf_db::Database;
use shelf_kernel::ModuleRegistry;

/// Build a registry holding every application module, backed by `db`.
pub fn build_registry(db: &Database) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, db)?;
    Ok(registry)
}
