//! Catalog service configuration.

use std::env;
use std::path::PathBuf;

use common::DatabaseConfig;

/// Catalog service configuration.
#[derive(Debug, Clone, Default)]
pub struct CatalogConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// JSON fixture loaded into an empty products table at startup
    pub seed_file: Option<PathBuf>,
}

impl CatalogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = DatabaseConfig::default();
        Self {
            database: DatabaseConfig {
                url: env::var("CATALOG_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.url),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.max_connections),
                min_connections: env::var("DATABASE_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.min_connections),
                query_timeout_ms: env::var("CATALOG_QUERY_TIMEOUT_MS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.query_timeout_ms),
            },
            seed_file: env::var("CATALOG_SEED_FILE")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        }
    }
}
