//! Integration tests for the product service against SQLite.

mod support;

use rust_decimal::Decimal;

use catalog_service_lib::repository::GenericRepository;
use catalog_service_lib::service::{ProductManager, ProductService};
use common::AppError;
use domain::{Product, ProductSpecParams, Specification};
use support::{catalog, insert, payload, product, repository, setup_db};

async fn stored_count(db: &sea_orm::DatabaseConnection) -> u64 {
    repository(db).count(&Specification::new()).await.unwrap()
}

#[tokio::test]
async fn test_list_products_pagination() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let service = ProductManager::new(db);

    let params = ProductSpecParams {
        types: vec!["Hats".into()],
        page_index: 1,
        page_size: 2,
        ..Default::default()
    };
    let page = service.list_products(params).await.unwrap();

    assert_eq!(page.page_index, 1);
    assert_eq!(page.page_size, 2);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.data.len(), 2);
    assert!(page.data.iter().all(|p| p.product_type == "Hats"));
}

#[tokio::test]
async fn test_list_products_clamps_page_size() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let service = ProductManager::new(db);

    let params = ProductSpecParams {
        page_size: 500,
        ..Default::default()
    };
    let page = service.list_products(params).await.unwrap();

    assert_eq!(page.page_size, 50);
    assert_eq!(page.data.len(), 6);
}

#[tokio::test]
async fn test_brands_are_distinct() {
    let db = setup_db().await;
    insert(
        &db,
        vec![
            product("One", "A", "Boards", 1),
            product("Two", "B", "Boards", 2),
            product("Three", "A", "Hats", 3),
        ],
    )
    .await;
    let service = ProductManager::new(db);

    let mut brands = service.list_brands().await.unwrap();
    brands.sort();
    assert_eq!(brands, vec!["A", "B"]);

    let mut types = service.list_types().await.unwrap();
    types.sort();
    assert_eq!(types, vec!["Boards", "Hats"]);
}

#[tokio::test]
async fn test_create_returns_stored_product() {
    let db = setup_db().await;
    let service = ProductManager::new(db.clone());

    let created = service
        .create_product(payload("Fresh Board", "Angular", "Boards", 120))
        .await
        .unwrap();

    assert!(created.id > 0);
    assert_eq!(created.name, "Fresh Board");
    assert_eq!(service.get_product(created.id).await.unwrap(), Some(created));
}

#[tokio::test]
async fn test_create_ignores_payload_id() {
    let db = setup_db().await;
    let existing = insert(&db, vec![product("Kept", "Angular", "Boards", 5)]).await;
    let service = ProductManager::new(db.clone());

    let mut body = payload("Another", "React", "Hats", 7);
    body.id = Some(existing[0].id);
    let created = service.create_product(body).await.unwrap();

    assert_ne!(created.id, existing[0].id);
    assert_eq!(stored_count(&db).await, 2);
}

#[tokio::test]
async fn test_create_negative_price_rejected() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let service = ProductManager::new(db.clone());

    let mut body = payload("Broken", "Angular", "Boards", 1);
    body.price = Decimal::from(-1);
    let result = service.create_product(body).await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(stored_count(&db).await, 6);
}

#[tokio::test]
async fn test_create_missing_fields_rejected() {
    let db = setup_db().await;
    let service = ProductManager::new(db.clone());

    let mut body = payload("Nameless", "Angular", "Boards", 1);
    body.name = String::new();
    body.quantity_in_stock = 0;

    match service.create_product(body).await {
        Err(AppError::Validation(msg)) => {
            assert!(msg.contains("Name is required"), "{}", msg);
            assert!(msg.contains("Quantity in stock"), "{}", msg);
        }
        other => panic!("expected validation error, got {:?}", other),
    }
    assert_eq!(stored_count(&db).await, 0);
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let service = ProductManager::new(db.clone());

    let result = service.delete_product(404).await;

    assert!(matches!(result, Err(AppError::NotFound(_))));
    assert_eq!(stored_count(&db).await, 6);
}

#[tokio::test]
async fn test_delete_existing() {
    let db = setup_db().await;
    let inserted = insert(&db, catalog()).await;
    let service = ProductManager::new(db.clone());

    service.delete_product(inserted[2].id).await.unwrap();

    assert_eq!(service.get_product(inserted[2].id).await.unwrap(), None);
    assert_eq!(stored_count(&db).await, 5);
}

#[tokio::test]
async fn test_update_missing_fails_without_changes() {
    let db = setup_db().await;
    let inserted = insert(&db, catalog()).await;
    let service = ProductManager::new(db.clone());

    let result = service
        .update_product(999, payload("Nowhere", "Angular", "Boards", 3))
        .await;

    assert!(matches!(result, Err(AppError::PreconditionFailed(_))));
    let all = repository(&db).get_all().await.unwrap();
    assert_eq!(all.len(), inserted.len());
    assert!(all.iter().all(|p| p.name != "Nowhere"));
}

#[tokio::test]
async fn test_update_existing_replaces_row() {
    let db = setup_db().await;
    let inserted = insert(&db, catalog()).await;
    let service = ProductManager::new(db.clone());
    let target = inserted[0].id;

    let mut body = payload("Replaced Board", "React", "Boards", 42);
    body.id = Some(target + 100);
    body.description = "Brand new description".to_string();
    service.update_product(target, body).await.unwrap();

    let stored = service.get_product(target).await.unwrap().unwrap();
    let expected = Product {
        id: target,
        description: "Brand new description".to_string(),
        ..product("Replaced Board", "React", "Boards", 42)
    };
    assert_eq!(stored, expected);
    assert_eq!(stored_count(&db).await, 6);
}

#[tokio::test]
async fn test_ping() {
    let db = setup_db().await;
    let service = ProductManager::new(db);
    assert!(service.ping().await.is_ok());
}
