//! Initial catalog data.

use std::path::Path;

use sea_orm::DatabaseConnection;
use tracing::info;

use common::{AppError, AppResult};
use domain::{Product, Specification};

use crate::repository::{GenericRepository, Repository, StoreContext};

/// Load products from a JSON file into an empty table.
///
/// Returns the number of inserted products; zero when the table already had
/// rows.
pub async fn seed_products(db: &DatabaseConnection, path: &Path) -> AppResult<usize> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        AppError::internal(format!("cannot read seed file {}: {}", path.display(), e))
    })?;
    seed_products_from_json(db, &raw).await
}

/// Same as [`seed_products`] with the JSON document already in memory.
pub async fn seed_products_from_json(db: &DatabaseConnection, raw: &str) -> AppResult<usize> {
    let mut repo = Repository::<Product>::new(StoreContext::new(db.clone()));

    let existing = repo.count(&Specification::new()).await?;
    if existing > 0 {
        info!(existing, "Products already present, skipping seed");
        return Ok(0);
    }

    let products: Vec<Product> = serde_json::from_str(raw)
        .map_err(|e| AppError::internal(format!("invalid seed data: {}", e)))?;

    for product in products {
        // Keys in the fixture are ignored; the store assigns them.
        repo.create(Product { id: 0, ..product });
    }

    if !repo.commit().await? {
        return Ok(0);
    }

    let seeded = repo.inserted().len();
    info!(seeded, "Seeded products");
    Ok(seeded)
}
