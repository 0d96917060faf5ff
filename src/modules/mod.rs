pub mod books;
pub mod entry;

use shelf_db::Database;
use shelf_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, db: &Database) -> anyhow::Result<()> {
    registry.register(entry::create_module());
    registry.register(books::create_module(db.clone())?);
    Ok(())
}
