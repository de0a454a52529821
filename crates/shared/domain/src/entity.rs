//! Entity identity and the field value vocabulary used by queries.

use std::cmp::Ordering;
use std::fmt;

use rust_decimal::Decimal;

use crate::error::{DomainError, DomainResult};

/// Common base for every persisted catalog entity.
///
/// Repositories and specifications are generic over this trait only, so any
/// type implementing it can be queried, counted and staged for changes.
pub trait BaseEntity: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Queryable fields of the entity.
    type Field: Copy + Eq + fmt::Debug + Send + Sync + 'static;

    /// Surrogate key. Zero means "not yet assigned by the store".
    fn id(&self) -> i32;

    /// Read one field as a comparable [`Value`].
    fn value(&self, field: Self::Field) -> Value;
}

/// A single field value, as seen by criteria, ordering and projections.
#[derive(Debug, Clone)]
pub enum Value {
    Int(i64),
    Decimal(Decimal),
    Text(String),
    Bool(bool),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Decimal(_) => "decimal",
            Value::Text(_) => "text",
            Value::Bool(_) => "bool",
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

// Int and Decimal compare numerically with each other; other mixed pairs are
// unordered.
impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a.partial_cmp(b),
            (Value::Decimal(a), Value::Decimal(b)) => a.partial_cmp(b),
            (Value::Int(a), Value::Decimal(b)) => Decimal::from(*a).partial_cmp(b),
            (Value::Decimal(a), Value::Int(b)) => a.partial_cmp(&Decimal::from(*b)),
            (Value::Text(a), Value::Text(b)) => a.partial_cmp(b),
            (Value::Bool(a), Value::Bool(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.partial_cmp(other) == Some(Ordering::Equal)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::Decimal(v) => write!(f, "{}", v),
            Value::Text(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<Decimal> for Value {
    fn from(v: Decimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Text(v.clone())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

/// Conversion from a [`Value`] into a projection result type.
pub trait FromValue: Sized {
    fn from_value(value: Value) -> DomainResult<Self>;
}

fn mismatch(expected: &str, found: &Value) -> DomainError {
    DomainError::projection(format!("expected {}, found {}", expected, found.kind()))
}

impl FromValue for Value {
    fn from_value(value: Value) -> DomainResult<Self> {
        Ok(value)
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(mismatch("text", &other)),
        }
    }
}

impl FromValue for i64 {
    fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Int(v) => Ok(v),
            other => Err(mismatch("int", &other)),
        }
    }
}

impl FromValue for i32 {
    fn from_value(value: Value) -> DomainResult<Self> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide)
            .map_err(|_| DomainError::projection(format!("{} does not fit in i32", wide)))
    }
}

impl FromValue for Decimal {
    fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Decimal(v) => Ok(v),
            Value::Int(v) => Ok(Decimal::from(v)),
            other => Err(mismatch("decimal", &other)),
        }
    }
}

impl FromValue for bool {
    fn from_value(value: Value) -> DomainResult<Self> {
        match value {
            Value::Bool(v) => Ok(v),
            other => Err(mismatch("bool", &other)),
        }
    }
}
