//! API Gateway Library
//!
//! This crate provides the HTTP REST API over the product catalog. The
//! catalog service is embedded in-process.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use catalog_service_lib::config::CatalogConfig;
use catalog_service_lib::service::ProductManager;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Run the gateway with configuration taken from the environment.
pub async fn run(host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = GatewayConfig::from_env();
    config.host = host.to_string();
    config.port = port;

    run_server_with_config(config, CatalogConfig::from_env()).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(
    config: GatewayConfig,
    catalog: CatalogConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    // Open the store, applying migrations and the optional seed
    let db = catalog_service_lib::open_store(&catalog).await?;

    // Cancelled on shutdown so in-flight store calls stop waiting
    let shutdown = CancellationToken::new();

    let products = ProductManager::new(db.get_connection())
        .with_query_timeout(catalog.database.query_timeout())
        .with_shutdown(shutdown.clone());

    let state = AppState::new(Arc::new(products), config.clone());
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    info!("Gateway stopped");
    Ok(())
}

/// Resolve on Ctrl+C or SIGTERM and cancel `token`.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }

    token.cancel();
}
