use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use shelf_db::Database;

/// Administrative commands for the Shelf database.
#[derive(Debug, Parser)]
#[command(name = "shelf-cli", version, about)]
struct Cli {
    /// Database file to operate on, overriding `database.path` from settings
    #[arg(long, global = true, value_name = "PATH")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the tables of every module
    InitDb,
    /// Drop the tables of every module
    DeleteDb,
    /// Insert sample books
    Testgen,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = shelf_kernel::settings::Settings::load()
        .with_context(|| "failed to load Shelf settings")?;
    shelf_telemetry::init(&settings.telemetry)?;

    let path = cli.database.unwrap_or(settings.database.path);
    let db = Database::open(&path)
        .with_context(|| format!("failed to open database at {}", path.display()))?;
    let registry = shelf_app::build_registry(&db)?;

    match cli.command {
        Command::InitDb => {
            let applied = db
                .apply_migrations(registry.collect_migrations())
                .await
                .context("failed to initialize database")?;
            tracing::info!(applied, path = %path.display(), "database initialized");
        }
        Command::DeleteDb => {
            let reverted = db
                .revert_migrations(registry.collect_migrations())
                .await
                .context("failed to delete database tables")?;
            tracing::info!(reverted, path = %path.display(), "database tables dropped");
        }
        Command::Testgen => {
            let ids = shelf_app::modules::books::seed::insert_initial_data(&db)
                .await
                .context("failed to insert sample data; has `init-db` been run?")?;
            tracing::info!(?ids, "test data generated");
        }
    }

    Ok(())
}
