//! In-memory query handle over a vector of items.

use std::cmp::Ordering;

use crate::entity::BaseEntity;
use crate::error::DomainResult;

use super::criteria::Criteria;
use super::query::{EntityQuery, Project, ResultQuery, SortDirection};
use super::spec::Projection;

/// Query handle backed by a `Vec`.
///
/// Projection errors are carried along and surface on [`MemoryQuery::into_vec`],
/// like a backend query failing when it is executed.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryQuery<T> {
    items: DomainResult<Vec<T>>,
}

impl<T> MemoryQuery<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items: Ok(items) }
    }

    /// Materialize the query.
    pub fn into_vec(self) -> DomainResult<Vec<T>> {
        self.items
    }

    /// Materialize the first item, if any.
    pub fn first(self) -> DomainResult<Option<T>> {
        Ok(self.items?.into_iter().next())
    }

    fn map_items(self, f: impl FnOnce(Vec<T>) -> Vec<T>) -> Self {
        Self {
            items: self.items.map(f),
        }
    }
}

impl<T> From<Vec<T>> for MemoryQuery<T> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

fn dedup_stable<T: PartialEq>(items: Vec<T>) -> Vec<T> {
    let mut unique: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.contains(&item) {
            unique.push(item);
        }
    }
    unique
}

fn window<T>(items: Vec<T>, skip: u64, take: u64) -> Vec<T> {
    let skip = usize::try_from(skip).unwrap_or(usize::MAX);
    let take = usize::try_from(take).unwrap_or(usize::MAX);
    items.into_iter().skip(skip).take(take).collect()
}

impl<T: BaseEntity> EntityQuery<T> for MemoryQuery<T> {
    fn filter(self, criteria: &Criteria<T::Field>) -> Self {
        self.map_items(|mut items| {
            items.retain(|item| criteria.matches(item));
            items
        })
    }

    // Stable sort; ties keep their current relative order.
    fn order_by(self, field: T::Field, direction: SortDirection) -> Self {
        self.map_items(|mut items| {
            items.sort_by(|a, b| {
                let ord = a
                    .value(field)
                    .partial_cmp(&b.value(field))
                    .unwrap_or(Ordering::Equal);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
            items
        })
    }

    fn distinct(self) -> Self {
        self.map_items(dedup_stable)
    }

    fn paginate(self, skip: u64, take: u64) -> Self {
        self.map_items(|items| window(items, skip, take))
    }
}

impl<T: PartialEq> ResultQuery for MemoryQuery<T> {
    fn distinct(self) -> Self {
        self.map_items(dedup_stable)
    }

    fn paginate(self, skip: u64, take: u64) -> Self {
        self.map_items(|items| window(items, skip, take))
    }
}

impl<T: BaseEntity, R: PartialEq> Project<T, R> for MemoryQuery<T> {
    type Output = MemoryQuery<R>;

    fn project(self, projection: &Projection<T, R>) -> MemoryQuery<R> {
        let items = self.items.and_then(|items| {
            items
                .into_iter()
                .map(|item| projection.apply(item))
                .collect::<DomainResult<Vec<R>>>()
        });
        MemoryQuery { items }
    }
}
