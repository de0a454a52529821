//! Domain layer - catalog entities and the query specification model.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Specifications describe queries declaratively; storage adapters in the
//! service crates translate them into backend queries.

pub mod constants;
pub mod entity;
pub mod error;
pub mod pagination;
pub mod product;
pub mod specification;

pub use constants::*;
pub use entity::{BaseEntity, FromValue, Value};
pub use error::{DomainError, DomainResult};
pub use pagination::Pagination;
#[cfg(feature = "openapi")]
pub use pagination::ProductPage;
pub use product::{Product, ProductField, ProductPayload};
pub use specification::{
    BrandListSpecification, Criteria, EntityQuery, MemoryQuery, PagingWindow,
    ProductSort, ProductSpecParams, ProductSpecification, Project, Projection,
    ProjectedSpecification, ResultQuery, SortDirection, Specification, SpecificationEvaluator,
    TypeListSpecification,
};
