//! Specification value objects.

use std::fmt;

use crate::entity::{BaseEntity, FromValue, Value};
use crate::error::{DomainError, DomainResult};

use super::criteria::Criteria;
use super::query::EntityQuery;

/// Rows to skip and rows to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingWindow {
    pub skip: u64,
    pub take: u64,
}

impl PagingWindow {
    pub fn new(skip: u64, take: u64) -> Self {
        Self { skip, take }
    }

    /// Window for a 1-based page. Page indexes below 1 are read as 1.
    pub fn from_page(page_index: u64, page_size: u64) -> Self {
        Self {
            skip: page_size.saturating_mul(page_index.max(1) - 1),
            take: page_size,
        }
    }
}

/// Declarative description of a query over `T`.
///
/// Paging is stored as one optional window, so skip and take are always set
/// together and are ignored while paging is off.
#[derive(Debug, Clone, PartialEq)]
pub struct Specification<T: BaseEntity> {
    criteria: Option<Criteria<T::Field>>,
    order_ascending: Option<T::Field>,
    order_descending: Option<T::Field>,
    distinct: bool,
    paging: Option<PagingWindow>,
}

impl<T: BaseEntity> Default for Specification<T> {
    fn default() -> Self {
        Self {
            criteria: None,
            order_ascending: None,
            order_descending: None,
            distinct: false,
            paging: None,
        }
    }
}

impl<T: BaseEntity> Specification<T> {
    /// Specification matching every entity.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_criteria(criteria: Criteria<T::Field>) -> Self {
        Self {
            criteria: Some(criteria),
            ..Self::default()
        }
    }

    pub fn order_by_ascending(mut self, field: T::Field) -> Self {
        self.order_ascending = Some(field);
        self
    }

    pub fn order_by_descending(mut self, field: T::Field) -> Self {
        self.order_descending = Some(field);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    /// Enable paging with both bounds at once.
    pub fn paging(mut self, skip: u64, take: u64) -> Self {
        self.paging = Some(PagingWindow::new(skip, take));
        self
    }

    /// Attach a mandatory projection, producing a projected specification.
    pub fn select<R>(self, projection: Projection<T, R>) -> ProjectedSpecification<T, R> {
        ProjectedSpecification {
            base: self,
            projection,
        }
    }

    pub fn criteria(&self) -> Option<&Criteria<T::Field>> {
        self.criteria.as_ref()
    }

    pub fn order_ascending(&self) -> Option<T::Field> {
        self.order_ascending
    }

    pub fn order_descending(&self) -> Option<T::Field> {
        self.order_descending
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_paging_enabled(&self) -> bool {
        self.paging.is_some()
    }

    pub fn paging_window(&self) -> Option<PagingWindow> {
        self.paging
    }

    /// Rows skipped when paging is on, otherwise 0.
    pub fn skip(&self) -> u64 {
        self.paging.map_or(0, |w| w.skip)
    }

    /// Rows kept when paging is on, otherwise 0.
    pub fn take(&self) -> u64 {
        self.paging.map_or(0, |w| w.take)
    }

    /// Apply only the filter, leaving ordering, distinct and paging aside.
    /// Counting uses this so totals are independent of the page.
    pub fn apply_criteria<Q: EntityQuery<T>>(&self, query: Q) -> Q {
        match &self.criteria {
            Some(criteria) => query.filter(criteria),
            None => query,
        }
    }
}

/// How an entity is turned into a result value.
///
/// Either a single field, decoded into `R`, or the whole entity when `R` is
/// the entity type itself. Distinct and paging always see the projected
/// shape, so a projection cannot map rows into anything else.
pub struct Projection<T: BaseEntity, R> {
    kind: ProjectionKind<T, R>,
}

enum ProjectionKind<T: BaseEntity, R> {
    Field {
        field: T::Field,
        decode: fn(Value) -> DomainResult<R>,
    },
    Identity(fn(T) -> R),
}

impl<T: BaseEntity, R: FromValue> Projection<T, R> {
    pub fn field(field: T::Field) -> Self {
        Self {
            kind: ProjectionKind::Field {
                field,
                decode: R::from_value,
            },
        }
    }
}

impl<T: BaseEntity> Projection<T, T> {
    pub fn identity() -> Self {
        Self {
            kind: ProjectionKind::Identity(std::convert::identity),
        }
    }
}

impl<T: BaseEntity, R> Projection<T, R> {
    /// Project a single entity.
    pub fn apply(&self, entity: T) -> DomainResult<R> {
        match self.kind {
            ProjectionKind::Field { field, decode } => decode(entity.value(field)),
            ProjectionKind::Identity(map) => Ok(map(entity)),
        }
    }

    /// Decode a value already read from the projected field.
    pub fn decode(&self, value: Value) -> DomainResult<R> {
        match self.kind {
            ProjectionKind::Field { decode, .. } => decode(value),
            ProjectionKind::Identity(_) => Err(DomainError::projection(
                "identity projection cannot decode a single field",
            )),
        }
    }

    /// The field read by a field projection; `None` for the whole entity.
    pub fn target_field(&self) -> Option<T::Field> {
        match self.kind {
            ProjectionKind::Field { field, .. } => Some(field),
            ProjectionKind::Identity(_) => None,
        }
    }
}

impl<T: BaseEntity, R> Clone for Projection<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: BaseEntity, R> Copy for Projection<T, R> {}

impl<T: BaseEntity, R> Clone for ProjectionKind<T, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: BaseEntity, R> Copy for ProjectionKind<T, R> {}

impl<T: BaseEntity, R> fmt::Debug for Projection<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ProjectionKind::Field { field, .. } => f.debug_tuple("Field").field(&field).finish(),
            ProjectionKind::Identity(_) => f.write_str("Identity"),
        }
    }
}

/// A specification whose results are projected values `R`.
#[derive(Debug, Clone)]
pub struct ProjectedSpecification<T: BaseEntity, R> {
    base: Specification<T>,
    projection: Projection<T, R>,
}

impl<T: BaseEntity, R> ProjectedSpecification<T, R> {
    pub fn new(base: Specification<T>, projection: Projection<T, R>) -> Self {
        Self { base, projection }
    }

    pub fn specification(&self) -> &Specification<T> {
        &self.base
    }

    pub fn projection(&self) -> &Projection<T, R> {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Product, ProductField};

    #[test]
    fn test_new_has_no_clauses() {
        let spec = Specification::<Product>::new();
        assert!(spec.criteria().is_none());
        assert!(!spec.is_distinct());
        assert!(!spec.is_paging_enabled());
        assert_eq!((spec.skip(), spec.take()), (0, 0));
    }

    #[test]
    fn test_paging_sets_both_bounds() {
        let spec = Specification::<Product>::new().paging(12, 6);
        assert!(spec.is_paging_enabled());
        assert_eq!(spec.paging_window(), Some(PagingWindow::new(12, 6)));
        assert_eq!((spec.skip(), spec.take()), (12, 6));
    }

    #[test]
    fn test_both_orderings_are_kept() {
        let spec = Specification::<Product>::new()
            .order_by_ascending(ProductField::Name)
            .order_by_descending(ProductField::Price);
        assert_eq!(spec.order_ascending(), Some(ProductField::Name));
        assert_eq!(spec.order_descending(), Some(ProductField::Price));
    }

    #[test]
    fn test_page_window_math() {
        assert_eq!(PagingWindow::from_page(1, 6), PagingWindow::new(0, 6));
        assert_eq!(PagingWindow::from_page(3, 6), PagingWindow::new(12, 6));
        assert_eq!(PagingWindow::from_page(0, 6), PagingWindow::new(0, 6));
    }

    #[test]
    fn test_field_projection_decodes() {
        let projection = Projection::<Product, String>::field(ProductField::Brand);
        assert_eq!(projection.target_field(), Some(ProductField::Brand));

        let wrong = Projection::<Product, i64>::field(ProductField::Brand);
        let product = Product {
            id: 1,
            name: "n".into(),
            description: "d".into(),
            price: Default::default(),
            picture_url: "p".into(),
            product_type: "t".into(),
            brand: "b".into(),
            quantity_in_stock: 1,
        };
        assert_eq!(projection.apply(product.clone()).unwrap(), "b");
        assert!(wrong.apply(product.clone()).is_err());
        assert_eq!(Projection::identity().apply(product.clone()).unwrap(), product);
    }

    #[test]
    fn test_identity_projection_reads_whole_entity() {
        let identity = Projection::<Product, Product>::identity();
        assert_eq!(identity.target_field(), None);
        assert!(identity.decode(Value::from("b")).is_err());

        let brand = Projection::<Product, String>::field(ProductField::Brand);
        assert_eq!(brand.decode(Value::from("b")).unwrap(), "b");
    }
}
