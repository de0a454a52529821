//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use domain::{Product, ProductPage, ProductPayload};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::product_handler::list_products,
        crate::handlers::product_handler::get_product,
        crate::handlers::product_handler::create_product,
        crate::handlers::product_handler::update_product,
        crate::handlers::product_handler::delete_product,
        crate::handlers::product_handler::list_brands,
        crate::handlers::product_handler::list_types,
        crate::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            Product,
            ProductPayload,
            ProductPage,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_product_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        assert!(paths.iter().any(|p| p.as_str() == "/products"));
        assert!(paths.iter().any(|p| p.as_str() == "/products/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/products/brands"));
    }
}
