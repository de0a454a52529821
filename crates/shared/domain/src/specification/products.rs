//! Catalog specifications.

use std::ops::Deref;

use crate::constants::{
    DEFAULT_PAGE_INDEX, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, SORT_PRICE_ASC, SORT_PRICE_DESC,
};
use crate::product::{Product, ProductField};

use super::criteria::Criteria;
use super::spec::{PagingWindow, ProjectedSpecification, Projection, Specification};

/// Listing order. Unknown keys fall back to name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    NameAsc,
    PriceAsc,
    PriceDesc,
}

impl From<&str> for ProductSort {
    fn from(s: &str) -> Self {
        match s {
            SORT_PRICE_ASC => ProductSort::PriceAsc,
            SORT_PRICE_DESC => ProductSort::PriceDesc,
            _ => ProductSort::NameAsc,
        }
    }
}

impl From<Option<&str>> for ProductSort {
    fn from(s: Option<&str>) -> Self {
        s.map(ProductSort::from).unwrap_or_default()
    }
}

/// Product listing parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductSpecParams {
    pub brands: Vec<String>,
    pub types: Vec<String>,
    pub search: Option<String>,
    pub sort: ProductSort,
    pub page_index: u64,
    pub page_size: u64,
}

impl Default for ProductSpecParams {
    fn default() -> Self {
        Self {
            brands: Vec::new(),
            types: Vec::new(),
            search: None,
            sort: ProductSort::default(),
            page_index: DEFAULT_PAGE_INDEX,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ProductSpecParams {
    /// Page index, at least 1.
    pub fn page_index(&self) -> u64 {
        self.page_index.max(DEFAULT_PAGE_INDEX)
    }

    /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub fn window(&self) -> PagingWindow {
        PagingWindow::from_page(self.page_index(), self.page_size())
    }

    /// Trimmed search term, if a non-blank one was given.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }

    /// Filter shared by the page query and the total count.
    ///
    /// Empty brand or type lists mean "any".
    pub fn criteria(&self) -> Option<Criteria<ProductField>> {
        let mut clauses = Vec::new();
        if !self.brands.is_empty() {
            clauses.push(Criteria::is_in(ProductField::Brand, &self.brands));
        }
        if !self.types.is_empty() {
            clauses.push(Criteria::is_in(ProductField::Type, &self.types));
        }
        if let Some(term) = self.search_term() {
            clauses.push(Criteria::contains(ProductField::Name, term));
        }

        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(Criteria::all(clauses)),
        }
    }
}

/// Filtered, sorted and paged product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSpecification(Specification<Product>);

impl ProductSpecification {
    pub fn new(params: &ProductSpecParams) -> Self {
        let spec = match params.criteria() {
            Some(criteria) => Specification::with_criteria(criteria),
            None => Specification::new(),
        };
        let window = params.window();
        let spec = spec.paging(window.skip, window.take);

        let spec = match params.sort {
            ProductSort::PriceAsc => spec.order_by_ascending(ProductField::Price),
            ProductSort::PriceDesc => spec.order_by_descending(ProductField::Price),
            ProductSort::NameAsc => spec.order_by_ascending(ProductField::Name),
        };

        Self(spec)
    }
}

impl Deref for ProductSpecification {
    type Target = Specification<Product>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Distinct brand names.
#[derive(Debug, Clone)]
pub struct BrandListSpecification(ProjectedSpecification<Product, String>);

impl BrandListSpecification {
    pub fn new() -> Self {
        Self(
            Specification::new()
                .distinct()
                .select(Projection::field(ProductField::Brand)),
        )
    }
}

impl Default for BrandListSpecification {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for BrandListSpecification {
    type Target = ProjectedSpecification<Product, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Distinct product type names.
#[derive(Debug, Clone)]
pub struct TypeListSpecification(ProjectedSpecification<Product, String>);

impl TypeListSpecification {
    pub fn new() -> Self {
        Self(
            Specification::new()
                .distinct()
                .select(Projection::field(ProductField::Type)),
        )
    }
}

impl Default for TypeListSpecification {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for TypeListSpecification {
    type Target = ProjectedSpecification<Product, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
