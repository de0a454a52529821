//! Query handle abstractions.
//!
//! The evaluator layers a specification onto a handle without knowing what
//! backs it. Handles are deferred: nothing runs until the owner materializes
//! the handle.

use crate::entity::BaseEntity;

use super::criteria::Criteria;
use super::spec::Projection;

/// Direction of an ordering clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// A deferred query over entities of type `T`.
pub trait EntityQuery<T: BaseEntity>: Sized {
    /// Narrow the result set.
    fn filter(self, criteria: &Criteria<T::Field>) -> Self;

    /// Order by a single field, replacing any ordering applied earlier.
    fn order_by(self, field: T::Field, direction: SortDirection) -> Self;

    fn distinct(self) -> Self;

    /// Skip `skip` rows, then keep at most `take`.
    fn paginate(self, skip: u64, take: u64) -> Self;
}

/// A deferred query over projected values.
pub trait ResultQuery: Sized {
    fn distinct(self) -> Self;

    fn paginate(self, skip: u64, take: u64) -> Self;
}

/// Switch an entity query into a query over projected values `R`.
pub trait Project<T: BaseEntity, R>: EntityQuery<T> {
    type Output: ResultQuery;

    fn project(self, projection: &Projection<T, R>) -> Self::Output;
}
