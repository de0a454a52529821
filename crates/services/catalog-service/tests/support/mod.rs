//! Shared fixtures for catalog integration tests.

#![allow(dead_code)]

use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use catalog_service_lib::infra::Migrator;
use catalog_service_lib::repository::{GenericRepository, Repository, StoreContext};
use domain::{Product, ProductPayload};

/// Fresh in-memory SQLite store with the schema applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None).await.expect("Failed to run migrations");
    db
}

pub fn product(name: &str, brand: &str, product_type: &str, price: i64) -> Product {
    Product {
        id: 0,
        name: name.to_string(),
        description: format!("{} description", name),
        price: Decimal::from(price),
        picture_url: format!("images/products/{}.png", name.to_lowercase().replace(' ', "-")),
        product_type: product_type.to_string(),
        brand: brand.to_string(),
        quantity_in_stock: 10,
    }
}

pub fn payload(name: &str, brand: &str, product_type: &str, price: i64) -> ProductPayload {
    ProductPayload::from(product(name, brand, product_type, price))
}

/// Insert products in one commit and return them with assigned ids.
pub async fn insert(db: &DatabaseConnection, products: Vec<Product>) -> Vec<Product> {
    let mut repo = Repository::<Product>::new(StoreContext::new(db.clone()));
    for p in products {
        repo.create(p);
    }
    assert!(repo.commit().await.expect("seed commit failed"));
    repo.inserted().to_vec()
}

pub fn repository(db: &DatabaseConnection) -> Repository<Product> {
    Repository::new(StoreContext::new(db.clone()))
}

/// Six products over three brands and two types.
pub fn catalog() -> Vec<Product> {
    vec![
        product("Angular Speedster Board", "Angular", "Boards", 200),
        product("Green Angular Board", "Angular", "Boards", 150),
        product("Core Board Speed Rush", "NetCore", "Boards", 180),
        product("Core Blue Hat", "NetCore", "Hats", 10),
        product("Green React Woolen Hat", "React", "Hats", 8),
        product("Purple React Woolen Hat", "React", "Hats", 15),
    ]
}
