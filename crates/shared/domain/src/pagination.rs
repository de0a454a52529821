//! Paged result envelope for list endpoints.

use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use crate::product::Product;

/// One page of results plus the pre-paging match count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(
    feature = "openapi",
    derive(utoipa::ToSchema),
    aliases(ProductPage = Pagination<Product>)
)]
#[serde(rename_all = "camelCase")]
pub struct Pagination<T> {
    pub page_index: u64,
    pub page_size: u64,
    /// Matches for the filter alone, independent of the page window
    pub total_count: u64,
    pub data: Vec<T>,
}

impl<T> Pagination<T> {
    pub fn new(page_index: u64, page_size: u64, total_count: u64, data: Vec<T>) -> Self {
        Self {
            page_index,
            page_size,
            total_count,
            data,
        }
    }
}
