//! SeaORM query handles for the specification evaluator.
//!
//! Criteria become `Condition`s, orderings replace the statement's ORDER BY,
//! distinct becomes `SELECT DISTINCT` and paging becomes OFFSET/LIMIT. A field
//! projection narrows the select list to that single column, so distinct and
//! paging apply to projected values.

use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, QueryTrait,
    Select,
};

use domain::{Criteria, EntityQuery, Project, Projection, ResultQuery, SortDirection, Value};

use super::stored::StoredEntity;

/// Deferred entity query.
pub struct EntitySelect<T: StoredEntity> {
    select: Select<T::Entity>,
}

impl<T: StoredEntity> EntitySelect<T> {
    /// Query over the whole table.
    pub fn new() -> Self {
        Self {
            select: T::Entity::find(),
        }
    }

    pub fn into_select(self) -> Select<T::Entity> {
        self.select
    }
}

impl<T: StoredEntity> Default for EntitySelect<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: StoredEntity> EntityQuery<T> for EntitySelect<T> {
    fn filter(self, criteria: &Criteria<T::Field>) -> Self {
        Self {
            select: self.select.filter(condition::<T>(criteria)),
        }
    }

    fn order_by(mut self, field: T::Field, direction: SortDirection) -> Self {
        QueryTrait::query(&mut self.select).clear_order_by();
        let order = match direction {
            SortDirection::Ascending => Order::Asc,
            SortDirection::Descending => Order::Desc,
        };
        Self {
            select: self.select.order_by(T::column(field), order),
        }
    }

    fn distinct(self) -> Self {
        Self {
            select: self.select.distinct(),
        }
    }

    fn paginate(self, skip: u64, take: u64) -> Self {
        Self {
            select: self.select.offset(skip).limit(take),
        }
    }
}

impl<T: StoredEntity, R> Project<T, R> for EntitySelect<T> {
    type Output = ProjectedSelect<T, R>;

    fn project(self, projection: &Projection<T, R>) -> ProjectedSelect<T, R> {
        let select = match projection.target_field() {
            Some(field) => self.select.select_only().column(T::column(field)),
            None => self.select,
        };
        ProjectedSelect {
            select,
            projection: *projection,
        }
    }
}

/// Deferred query over projected values.
pub struct ProjectedSelect<T: StoredEntity, R> {
    select: Select<T::Entity>,
    projection: Projection<T, R>,
}

impl<T: StoredEntity, R> ProjectedSelect<T, R> {
    pub fn into_parts(self) -> (Select<T::Entity>, Projection<T, R>) {
        (self.select, self.projection)
    }
}

impl<T: StoredEntity, R> ResultQuery for ProjectedSelect<T, R> {
    fn distinct(self) -> Self {
        Self {
            select: self.select.distinct(),
            projection: self.projection,
        }
    }

    fn paginate(self, skip: u64, take: u64) -> Self {
        Self {
            select: self.select.offset(skip).limit(take),
            projection: self.projection,
        }
    }
}

fn db_value(value: &Value) -> sea_orm::Value {
    match value {
        Value::Int(v) => (*v).into(),
        Value::Decimal(v) => (*v).into(),
        Value::Text(v) => v.clone().into(),
        Value::Bool(v) => (*v).into(),
    }
}

const LIKE_ESCAPE: char = '|';

/// Escape LIKE metacharacters so the needle matches literally.
fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, LIKE_ESCAPE | '%' | '_') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

fn never() -> Condition {
    Condition::all().add(Expr::val(1).eq(0))
}

/// Translate a criteria tree into a SeaORM condition.
pub(crate) fn condition<T: StoredEntity>(criteria: &Criteria<T::Field>) -> Condition {
    match criteria {
        Criteria::Eq(f, v) => Condition::all().add(T::column(*f).eq(db_value(v))),
        Criteria::Ne(f, v) => Condition::all().add(T::column(*f).ne(db_value(v))),
        Criteria::Gt(f, v) => Condition::all().add(T::column(*f).gt(db_value(v))),
        Criteria::Gte(f, v) => Condition::all().add(T::column(*f).gte(db_value(v))),
        Criteria::Lt(f, v) => Condition::all().add(T::column(*f).lt(db_value(v))),
        Criteria::Lte(f, v) => Condition::all().add(T::column(*f).lte(db_value(v))),
        Criteria::In(_, values) if values.is_empty() => never(),
        Criteria::In(f, values) => {
            Condition::all().add(T::column(*f).is_in(values.iter().map(db_value)))
        }
        Criteria::Contains(f, needle) => {
            let column = Expr::col((T::Entity::default(), T::column(*f)));
            let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
            let like = LikeExpr::new(pattern).escape(LIKE_ESCAPE);
            Condition::all().add(Expr::expr(Func::lower(column)).like(like))
        }
        Criteria::And(clauses) => clauses
            .iter()
            .fold(Condition::all(), |acc, c| acc.add(condition::<T>(c))),
        Criteria::Or(clauses) if clauses.is_empty() => never(),
        Criteria::Or(clauses) => clauses
            .iter()
            .fold(Condition::any(), |acc, c| acc.add(condition::<T>(c))),
        Criteria::Not(inner) => condition::<T>(inner).not(),
    }
}
