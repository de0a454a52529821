//! Product catalog handlers.

use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use serde::Deserialize;
use utoipa::IntoParams;

use common::AppResult;
use domain::{
    Pagination, Product, ProductPayload, ProductSort, ProductSpecParams, DEFAULT_PAGE_INDEX,
    DEFAULT_PAGE_SIZE,
};

use crate::extractors::{IdPath, ListQuery, ValidatedJson};
use crate::state::AppState;

/// Product list query parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductListQuery {
    /// Brand filter; repeat the key or separate values with commas
    #[serde(default, alias = "brands[]")]
    pub brands: Vec<String>,
    /// Type filter; repeat the key or separate values with commas
    #[serde(default, alias = "types[]")]
    pub types: Vec<String>,
    /// Case-insensitive substring of the product name
    pub search: Option<String>,
    /// `priceAsc` or `priceDesc`; anything else sorts by name
    pub sort: Option<String>,
    /// 1-based page number; lower values select the first page
    pub page_index: Option<i64>,
    /// Page size, clamped to 1..=50
    pub page_size: Option<i64>,
}

impl From<ProductListQuery> for ProductSpecParams {
    fn from(query: ProductListQuery) -> Self {
        Self {
            brands: split_values(query.brands),
            types: split_values(query.types),
            search: query.search,
            sort: ProductSort::from(query.sort.as_deref()),
            page_index: query.page_index.map_or(DEFAULT_PAGE_INDEX, non_negative),
            page_size: query.page_size.map_or(DEFAULT_PAGE_SIZE, non_negative),
        }
    }
}

/// Negative values become zero; `ProductSpecParams` clamps from there.
fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or(0)
}

fn split_values(raw: Vec<String>) -> Vec<String> {
    raw.iter()
        .flat_map(|v| v.split(','))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Create product routes
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/brands", get(list_brands))
        .route("/types", get(list_types))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}

/// List products with filtering, sorting and paging
#[utoipa::path(
    get,
    path = "/products",
    tag = "Products",
    params(ProductListQuery),
    responses(
        (status = 200, description = "One page of products", body = domain::ProductPage),
        (status = 400, description = "Malformed query string")
    )
)]
pub async fn list_products(
    State(state): State<AppState>,
    ListQuery(query): ListQuery<ProductListQuery>,
) -> AppResult<Json<Pagination<Product>>> {
    let page = state.products.list_products(query.into()).await?;
    Ok(Json(page))
}

/// Get product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "The product, or null when it does not exist", body = Product)
    )
)]
pub async fn get_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<Json<Option<Product>>> {
    let product = state.products.get_product(id).await?;
    Ok(Json(product))
}

/// Create a product
#[utoipa::path(
    post,
    path = "/products",
    tag = "Products",
    request_body = ProductPayload,
    responses(
        (status = 200, description = "Product created", body = Product),
        (status = 400, description = "Validation error or nothing was saved")
    )
)]
pub async fn create_product(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> AppResult<Json<Product>> {
    let product = state.products.create_product(payload).await?;
    tracing::info!(id = product.id, "Product created");
    Ok(Json(product))
}

/// Replace a product
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    request_body = ProductPayload,
    responses(
        (status = 204, description = "Product updated"),
        (status = 400, description = "Validation error, unknown product or nothing was saved")
    )
)]
pub async fn update_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
    ValidatedJson(payload): ValidatedJson<ProductPayload>,
) -> AppResult<StatusCode> {
    state.products.update_product(id, payload).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "Products",
    params(
        ("id" = i32, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Product deleted"),
        (status = 400, description = "Nothing was deleted"),
        (status = 404, description = "Product not found")
    )
)]
pub async fn delete_product(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> AppResult<StatusCode> {
    state.products.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Distinct product brands
#[utoipa::path(
    get,
    path = "/products/brands",
    tag = "Products",
    responses(
        (status = 200, description = "Distinct brand names", body = Vec<String>)
    )
)]
pub async fn list_brands(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.products.list_brands().await?))
}

/// Distinct product types
#[utoipa::path(
    get,
    path = "/products/types",
    tag = "Products",
    responses(
        (status = 200, description = "Distinct product types", body = Vec<String>)
    )
)]
pub async fn list_types(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    Ok(Json(state.products.list_types().await?))
}
