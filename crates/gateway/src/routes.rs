//! Route configuration.

use std::any::Any;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::AppError;

use crate::config::GatewayConfig;
use crate::handlers::{health_routes, product_routes};
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::new()
        // Health check
        .nest("/health", health_routes())
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Product catalog
        .nest("/products", product_routes())
        .fallback(not_found)
        // Global middleware
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Structured 404 for unknown routes.
async fn not_found(uri: Uri) -> AppError {
    AppError::not_found(format!("No route for {}", uri.path()))
}

/// Turn a handler panic into the structured 500 body.
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::internal(format!("handler panicked: {}", detail)).into_response()
}

fn cors_layer(config: &GatewayConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse() {
            Ok(origin) => Some(origin),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .max_age(Duration::from_secs(3600))
}
