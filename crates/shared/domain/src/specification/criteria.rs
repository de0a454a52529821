//! Backend-agnostic filter predicates.
//!
//! A [`Criteria`] tree is data, not a closure: the in-memory handle evaluates
//! it with [`Criteria::matches`], storage adapters translate it into their own
//! condition language.

use std::ops::Not;

use crate::entity::{BaseEntity, Value};

/// Filter predicate over the fields `F` of an entity.
#[derive(Debug, Clone, PartialEq)]
pub enum Criteria<F> {
    Eq(F, Value),
    Ne(F, Value),
    Gt(F, Value),
    Gte(F, Value),
    Lt(F, Value),
    Lte(F, Value),
    /// Field equals one of the values. An empty list matches nothing.
    In(F, Vec<Value>),
    /// Case-insensitive substring match on the field's text.
    Contains(F, String),
    /// Every clause holds. An empty list matches everything.
    And(Vec<Criteria<F>>),
    /// At least one clause holds. An empty list matches nothing.
    Or(Vec<Criteria<F>>),
    Not(Box<Criteria<F>>),
}

impl<F: Copy> Criteria<F> {
    pub fn eq(field: F, value: impl Into<Value>) -> Self {
        Criteria::Eq(field, value.into())
    }

    pub fn ne(field: F, value: impl Into<Value>) -> Self {
        Criteria::Ne(field, value.into())
    }

    pub fn gt(field: F, value: impl Into<Value>) -> Self {
        Criteria::Gt(field, value.into())
    }

    pub fn gte(field: F, value: impl Into<Value>) -> Self {
        Criteria::Gte(field, value.into())
    }

    pub fn lt(field: F, value: impl Into<Value>) -> Self {
        Criteria::Lt(field, value.into())
    }

    pub fn lte(field: F, value: impl Into<Value>) -> Self {
        Criteria::Lte(field, value.into())
    }

    pub fn is_in<I, V>(field: F, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Criteria::In(field, values.into_iter().map(Into::into).collect())
    }

    pub fn contains(field: F, needle: impl Into<String>) -> Self {
        Criteria::Contains(field, needle.into())
    }

    pub fn all(clauses: Vec<Criteria<F>>) -> Self {
        Criteria::And(clauses)
    }

    pub fn any(clauses: Vec<Criteria<F>>) -> Self {
        Criteria::Or(clauses)
    }

    /// Conjunction, flattening into an existing `And`.
    pub fn and(self, other: Criteria<F>) -> Self {
        match self {
            Criteria::And(mut clauses) => {
                clauses.push(other);
                Criteria::And(clauses)
            }
            first => Criteria::And(vec![first, other]),
        }
    }

    /// Disjunction, flattening into an existing `Or`.
    pub fn or(self, other: Criteria<F>) -> Self {
        match self {
            Criteria::Or(mut clauses) => {
                clauses.push(other);
                Criteria::Or(clauses)
            }
            first => Criteria::Or(vec![first, other]),
        }
    }

    /// Evaluate against a single entity.
    pub fn matches<T>(&self, entity: &T) -> bool
    where
        T: BaseEntity<Field = F>,
    {
        match self {
            Criteria::Eq(f, v) => entity.value(*f) == *v,
            Criteria::Ne(f, v) => entity.value(*f) != *v,
            Criteria::Gt(f, v) => entity.value(*f) > *v,
            Criteria::Gte(f, v) => entity.value(*f) >= *v,
            Criteria::Lt(f, v) => entity.value(*f) < *v,
            Criteria::Lte(f, v) => entity.value(*f) <= *v,
            Criteria::In(f, values) => {
                let actual = entity.value(*f);
                values.iter().any(|v| actual == *v)
            }
            Criteria::Contains(f, needle) => entity
                .value(*f)
                .to_string()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Criteria::And(clauses) => clauses.iter().all(|c| c.matches(entity)),
            Criteria::Or(clauses) => clauses.iter().any(|c| c.matches(entity)),
            Criteria::Not(inner) => !inner.matches(entity),
        }
    }
}

impl<F> Not for Criteria<F> {
    type Output = Criteria<F>;

    fn not(self) -> Self::Output {
        match self {
            Criteria::Not(inner) => *inner,
            other => Criteria::Not(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{Product, ProductField};
    use rust_decimal::Decimal;

    fn board() -> Product {
        Product {
            id: 1,
            name: "Angular Speedster Board".to_string(),
            description: "fast".to_string(),
            price: Decimal::from(200),
            picture_url: "sb-ang1.png".to_string(),
            product_type: "Boards".to_string(),
            brand: "Angular".to_string(),
            quantity_in_stock: 10,
        }
    }

    #[test]
    fn test_comparisons() {
        let p = board();
        assert!(Criteria::eq(ProductField::Brand, "Angular").matches(&p));
        assert!(Criteria::ne(ProductField::Brand, "React").matches(&p));
        assert!(Criteria::gt(ProductField::Price, 150).matches(&p));
        assert!(Criteria::lte(ProductField::QuantityInStock, 10).matches(&p));
        assert!(!Criteria::lt(ProductField::Price, Decimal::from(200)).matches(&p));
    }

    #[test]
    fn test_in_with_empty_list_matches_nothing() {
        let empty: Vec<&str> = Vec::new();
        assert!(!Criteria::is_in(ProductField::Brand, empty).matches(&board()));
        assert!(Criteria::is_in(ProductField::Brand, ["React", "Angular"]).matches(&board()));
    }

    #[test]
    fn test_contains_ignores_case() {
        assert!(Criteria::contains(ProductField::Name, "speedSTER").matches(&board()));
        assert!(!Criteria::contains(ProductField::Name, "glove").matches(&board()));
    }

    #[test]
    fn test_empty_groups() {
        assert!(Criteria::<ProductField>::all(vec![]).matches(&board()));
        assert!(!Criteria::<ProductField>::any(vec![]).matches(&board()));
    }

    #[test]
    fn test_combinators_flatten_and_negate() {
        let c = Criteria::eq(ProductField::Brand, "Angular")
            .and(Criteria::eq(ProductField::Type, "Boards"))
            .and(Criteria::gt(ProductField::Price, 100));
        assert!(matches!(&c, Criteria::And(clauses) if clauses.len() == 3));
        assert!(c.matches(&board()));

        let negated = !Criteria::eq(ProductField::Brand, "Angular");
        assert!(!negated.matches(&board()));
        assert_eq!(!negated, Criteria::eq(ProductField::Brand, "Angular"));
    }
}
