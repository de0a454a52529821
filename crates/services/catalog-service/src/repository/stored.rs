//! Binding between domain entities and their SeaORM tables.

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::NotSet, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, ModelTrait, QueryResult, Set,
};

use domain::{BaseEntity, Product, ProductField, Value};

use super::entities::product;

/// Column type of a stored entity's table.
pub type ColumnOf<T> = <<T as StoredEntity>::Entity as EntityTrait>::Column;

/// A domain entity persisted through SeaORM.
///
/// This is the only place that knows both the domain field vocabulary and the
/// table columns; the query handles and the repository are generic over it.
pub trait StoredEntity: BaseEntity {
    type Entity: EntityTrait<Model = Self::Model>;
    type Model: FromQueryResult
        + ModelTrait<Entity = Self::Entity>
        + IntoActiveModel<Self::ActiveModel>
        + Send
        + Sync;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Singular name used in logs and error details.
    const NAME: &'static str;

    fn column(field: Self::Field) -> ColumnOf<Self>;

    fn id_column() -> ColumnOf<Self>;

    fn from_model(model: Self::Model) -> Self;

    /// Active model with every column set. An id of zero or less is left
    /// unset so that the store assigns one.
    fn to_active_model(&self) -> Self::ActiveModel;

    /// Read a single projected column from a raw row.
    fn read_field(row: &QueryResult, field: Self::Field) -> Result<Value, DbErr>;
}

impl StoredEntity for Product {
    type Entity = product::Entity;
    type Model = product::Model;
    type ActiveModel = product::ActiveModel;

    const NAME: &'static str = "Product";

    fn column(field: ProductField) -> product::Column {
        match field {
            ProductField::Id => product::Column::Id,
            ProductField::Name => product::Column::Name,
            ProductField::Description => product::Column::Description,
            ProductField::Price => product::Column::Price,
            ProductField::PictureUrl => product::Column::PictureUrl,
            ProductField::Type => product::Column::ProductType,
            ProductField::Brand => product::Column::Brand,
            ProductField::QuantityInStock => product::Column::QuantityInStock,
        }
    }

    fn id_column() -> product::Column {
        product::Column::Id
    }

    fn from_model(model: product::Model) -> Self {
        Product::from(model)
    }

    fn to_active_model(&self) -> product::ActiveModel {
        product::ActiveModel {
            id: if self.id > 0 { Set(self.id) } else { NotSet },
            name: Set(self.name.clone()),
            description: Set(self.description.clone()),
            price: Set(self.price),
            picture_url: Set(self.picture_url.clone()),
            product_type: Set(self.product_type.clone()),
            brand: Set(self.brand.clone()),
            quantity_in_stock: Set(self.quantity_in_stock),
        }
    }

    fn read_field(row: &QueryResult, field: ProductField) -> Result<Value, DbErr> {
        Ok(match field {
            ProductField::Id | ProductField::QuantityInStock => {
                Value::from(row.try_get_by_index::<i32>(0)?)
            }
            ProductField::Price => Value::from(row.try_get_by_index::<rust_decimal::Decimal>(0)?),
            ProductField::Name
            | ProductField::Description
            | ProductField::PictureUrl
            | ProductField::Type
            | ProductField::Brand => Value::from(row.try_get_by_index::<String>(0)?),
        })
    }
}
