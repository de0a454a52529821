//! Application state for dependency injection.

use std::sync::Arc;

use catalog_service_lib::service::ProductService;

use crate::config::GatewayConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn ProductService>,
    pub config: GatewayConfig,
}

impl AppState {
    /// Create new app state.
    pub fn new(products: Arc<dyn ProductService>, config: GatewayConfig) -> Self {
        Self { products, config }
    }
}
