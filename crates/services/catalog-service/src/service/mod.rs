mod product_service;

#[cfg(any(test, feature = "test-utils"))]
pub use product_service::MockProductService;
pub use product_service::{ProductManager, ProductService};
