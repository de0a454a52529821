//! Product catalog entity and its write payload.

use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::entity::{BaseEntity, Value};

/// Product domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Assigned by the store on insert
    #[serde(default)]
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub picture_url: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

/// Queryable product fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
    Id,
    Name,
    Description,
    Price,
    PictureUrl,
    Type,
    Brand,
    QuantityInStock,
}

impl BaseEntity for Product {
    type Field = ProductField;

    fn id(&self) -> i32 {
        self.id
    }

    fn value(&self, field: ProductField) -> Value {
        match field {
            ProductField::Id => Value::from(self.id),
            ProductField::Name => Value::from(&self.name),
            ProductField::Description => Value::from(&self.description),
            ProductField::Price => Value::from(self.price),
            ProductField::PictureUrl => Value::from(&self.picture_url),
            ProductField::Type => Value::from(&self.product_type),
            ProductField::Brand => Value::from(&self.brand),
            ProductField::QuantityInStock => Value::from(self.quantity_in_stock),
        }
    }
}

/// Create/update request body.
///
/// Missing text fields deserialize as empty strings so that they are reported
/// by validation rather than by the JSON decoder.
#[derive(Debug, Clone, Deserialize, Validate)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Ignored on create; on update the path id wins
    #[serde(default)]
    pub id: Option<i32>,

    #[serde(default)]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[serde(default)]
    #[validate(length(min = 1, message = "Picture url is required"))]
    pub picture_url: String,

    #[serde(default, rename = "type")]
    #[validate(length(min = 1, message = "Product type is required"))]
    pub product_type: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Brand is required"))]
    pub brand: String,

    #[validate(range(min = 1, message = "Quantity in stock must be at least 1"))]
    pub quantity_in_stock: i32,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price < Decimal::ZERO {
        let mut error = ValidationError::new("price");
        error.message = Some(Cow::from("Price must not be negative"));
        return Err(error);
    }
    Ok(())
}

impl ProductPayload {
    /// Build the entity to persist under `id`. Zero asks the store for a new key.
    pub fn into_product(self, id: i32) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            picture_url: self.picture_url,
            product_type: self.product_type,
            brand: self.brand,
            quantity_in_stock: self.quantity_in_stock,
        }
    }
}

impl From<Product> for ProductPayload {
    fn from(product: Product) -> Self {
        Self {
            id: Some(product.id),
            name: product.name,
            description: product.description,
            price: product.price,
            picture_url: product.picture_url,
            product_type: product.product_type,
            brand: product.brand,
            quantity_in_stock: product.quantity_in_stock,
        }
    }
}
