//! Layers a specification onto a query handle.

use crate::entity::BaseEntity;

use super::query::{EntityQuery, Project, ResultQuery, SortDirection};
use super::spec::{ProjectedSpecification, Specification};

/// Stateless specification evaluator.
///
/// Clauses are applied in a fixed order: filter, ascending order, descending
/// order, projection, distinct, paging. Each ordering replaces the previous
/// one, so a specification that sets both ends up ordered descending.
pub struct SpecificationEvaluator;

impl SpecificationEvaluator {
    pub fn get_query<T, Q>(query: Q, spec: &Specification<T>) -> Q
    where
        T: BaseEntity,
        Q: EntityQuery<T>,
    {
        let mut query = Self::filter_and_order(query, spec);

        if spec.is_distinct() {
            query = query.distinct();
        }
        if let Some(window) = spec.paging_window() {
            query = query.paginate(window.skip, window.take);
        }

        query
    }

    pub fn get_projected_query<T, R, Q>(query: Q, spec: &ProjectedSpecification<T, R>) -> Q::Output
    where
        T: BaseEntity,
        Q: Project<T, R>,
    {
        let base = spec.specification();
        let mut projected = Self::filter_and_order(query, base).project(spec.projection());

        if base.is_distinct() {
            projected = projected.distinct();
        }
        if let Some(window) = base.paging_window() {
            projected = projected.paginate(window.skip, window.take);
        }

        projected
    }

    fn filter_and_order<T, Q>(query: Q, spec: &Specification<T>) -> Q
    where
        T: BaseEntity,
        Q: EntityQuery<T>,
    {
        let mut query = spec.apply_criteria(query);

        if let Some(field) = spec.order_ascending() {
            query = query.order_by(field, SortDirection::Ascending);
        }
        if let Some(field) = spec.order_descending() {
            query = query.order_by(field, SortDirection::Descending);
        }

        query
    }
}
