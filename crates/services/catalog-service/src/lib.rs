//! Catalog Service Library
//!
//! Product storage, the specification-driven repository and the catalog use
//! cases. The HTTP surface lives in the gateway, which embeds this crate.

pub mod config;
pub mod infra;
pub mod repository;
pub mod seed;
pub mod service;

use std::path::Path;

use tracing::info;

use crate::config::CatalogConfig;
use crate::infra::Database;

/// Connect, apply pending migrations and load the seed file when one is
/// configured.
pub async fn open_store(config: &CatalogConfig) -> Result<Database, Box<dyn std::error::Error>> {
    let db = Database::connect(&config.database).await?;

    if let Some(path) = &config.seed_file {
        seed::seed_products(db.connection(), path).await?;
    }

    Ok(db)
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(action: MigrateAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = CatalogConfig::from_env();
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}

/// Seed the products table from a JSON file (for CLI commands).
pub async fn run_seed(path: &Path) -> Result<usize, Box<dyn std::error::Error>> {
    let config = CatalogConfig::from_env();
    let db = Database::connect(&config.database).await?;
    let seeded = seed::seed_products(db.connection(), path).await?;
    Ok(seeded)
}
