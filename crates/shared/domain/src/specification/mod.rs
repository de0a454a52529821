//! Query specifications and their evaluation.
//!
//! A [`Specification`] collects a filter, orderings, a distinct flag and an
//! optional paging window. [`SpecificationEvaluator`] layers it onto any
//! [`EntityQuery`] handle: [`MemoryQuery`] here, database handles in the
//! service crates.

mod criteria;
mod evaluator;
mod memory;
mod products;
mod query;
mod spec;

pub use criteria::Criteria;
pub use evaluator::SpecificationEvaluator;
pub use memory::MemoryQuery;
pub use products::{
    BrandListSpecification, ProductSort, ProductSpecParams, ProductSpecification,
    TypeListSpecification,
};
pub use query::{EntityQuery, Project, ResultQuery, SortDirection};
pub use spec::{PagingWindow, ProjectedSpecification, Projection, Specification};
