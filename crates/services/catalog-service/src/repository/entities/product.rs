//! Product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::Product;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((16, 2)))")]
    pub price: Decimal,
    pub picture_url: String,
    #[sea_orm(column_name = "type")]
    pub product_type: String,
    pub brand: String,
    pub quantity_in_stock: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Product {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            picture_url: model.picture_url,
            product_type: model.product_type,
            brand: model.brand,
            quantity_in_stock: model.quantity_in_stock,
        }
    }
}
