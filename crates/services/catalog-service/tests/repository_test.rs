//! Integration tests for the generic repository against SQLite.

mod support;

use rust_decimal::Decimal;
use tokio_util::sync::CancellationToken;

use catalog_service_lib::repository::{Change, GenericRepository, Repository, StoreContext};
use common::AppError;
use domain::{
    BrandListSpecification, Criteria, MemoryQuery, Product, ProductField, ProductSort,
    ProductSpecParams, ProductSpecification, Projection, Specification, SpecificationEvaluator,
    TypeListSpecification,
};
use support::{catalog, insert, product, repository, setup_db};

#[tokio::test]
async fn test_create_assigns_ids() {
    let db = setup_db().await;
    let inserted = insert(&db, catalog()).await;

    assert_eq!(inserted.len(), 6);
    assert!(inserted.iter().all(|p| p.id > 0));

    let repo = repository(&db);
    let stored = repo.get_by_id(inserted[0].id).await.unwrap().unwrap();
    assert_eq!(stored, inserted[0]);
}

#[tokio::test]
async fn test_get_by_id_missing_is_none() {
    let db = setup_db().await;
    let repo = repository(&db);
    assert_eq!(repo.get_by_id(42).await.unwrap(), None);
    assert!(!repo.exists(42).await.unwrap());
}

#[tokio::test]
async fn test_get_all_returns_every_row() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let all = repository(&db).get_all().await.unwrap();
    assert_eq!(all.len(), 6);
}

#[tokio::test]
async fn test_count_ignores_paging_and_ordering() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let repo = repository(&db);

    let params = ProductSpecParams {
        brands: vec!["Angular".into(), "NetCore".into()],
        sort: ProductSort::PriceDesc,
        page_index: 2,
        page_size: 3,
        ..Default::default()
    };
    let spec = ProductSpecification::new(&params);

    let page = repo.get_all_with_specification(&*spec).await.unwrap();
    let total = repo.count(&*spec).await.unwrap();

    assert_eq!(total, 4);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Core Blue Hat");
}

#[tokio::test]
async fn test_paging_window_bounds() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let repo = repository(&db);

    let page = |index| ProductSpecParams {
        page_index: index,
        page_size: 4,
        ..Default::default()
    };

    let first = repo
        .get_all_with_specification(&*ProductSpecification::new(&page(1)))
        .await
        .unwrap();
    let second = repo
        .get_all_with_specification(&*ProductSpecification::new(&page(2)))
        .await
        .unwrap();
    let beyond = repo
        .get_all_with_specification(&*ProductSpecification::new(&page(3)))
        .await
        .unwrap();

    assert_eq!(first.len(), 4);
    assert_eq!(second.len(), 2);
    assert!(beyond.is_empty());
    assert!(first.iter().all(|p| !second.contains(p)));
}

#[tokio::test]
async fn test_default_sort_is_by_name() {
    let db = setup_db().await;
    insert(&db, catalog()).await;

    let spec = ProductSpecification::new(&ProductSpecParams::default());
    let products = repository(&db)
        .get_all_with_specification(&*spec)
        .await
        .unwrap();

    let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[tokio::test]
async fn test_price_sorts() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let repo = repository(&db);

    let params = |sort| ProductSpecParams {
        sort,
        ..Default::default()
    };
    let asc = repo
        .get_all_with_specification(&*ProductSpecification::new(&params(ProductSort::PriceAsc)))
        .await
        .unwrap();
    let desc = repo
        .get_all_with_specification(&*ProductSpecification::new(&params(ProductSort::PriceDesc)))
        .await
        .unwrap();

    assert_eq!(asc[0].price, Decimal::from(8));
    assert_eq!(desc[0].price, Decimal::from(200));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let db = setup_db().await;
    insert(&db, catalog()).await;

    let params = ProductSpecParams {
        search: Some("WOOLEN".into()),
        ..Default::default()
    };
    let spec = ProductSpecification::new(&params);
    let repo = repository(&db);

    assert_eq!(repo.count(&*spec).await.unwrap(), 2);
}

#[tokio::test]
async fn test_search_matches_wildcard_characters_literally() {
    let db = setup_db().await;
    let stored = insert(
        &db,
        vec![
            product("Plain Board", "Angular", "Boards", 20),
            product("Half_Off Hat", "React", "Hats", 5),
        ],
    )
    .await;
    let repo = repository(&db);

    for (needle, expected) in [("%", 0), ("_", 1), ("f_o", 1), ("plain", 1)] {
        let params = ProductSpecParams {
            search: Some(needle.to_string()),
            ..Default::default()
        };
        let spec = ProductSpecification::new(&params);

        let in_memory = SpecificationEvaluator::get_query(MemoryQuery::new(stored.clone()), &*spec)
            .into_vec()
            .unwrap();
        let found = repo.get_all_with_specification(&*spec).await.unwrap();

        assert_eq!(found.len(), expected, "search {:?}", needle);
        assert_eq!(found, in_memory, "search {:?}", needle);
    }
}

#[tokio::test]
async fn test_get_with_specification_returns_first() {
    let db = setup_db().await;
    insert(&db, catalog()).await;

    let spec = Specification::<Product>::with_criteria(Criteria::eq(ProductField::Brand, "React"))
        .order_by_descending(ProductField::Price);
    let first = repository(&db)
        .get_with_specification(&spec)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(first.name, "Purple React Woolen Hat");
}

#[tokio::test]
async fn test_distinct_projections() {
    let db = setup_db().await;
    insert(&db, catalog()).await;
    let repo = repository(&db);

    let brand_spec = BrandListSpecification::new();
    let mut brands = repo.get_all_projected(&*brand_spec).await.unwrap();
    brands.sort();
    assert_eq!(brands, vec!["Angular", "NetCore", "React"]);

    let type_spec = TypeListSpecification::new();
    let mut types = repo.get_all_projected(&*type_spec).await.unwrap();
    types.sort();
    assert_eq!(types, vec!["Boards", "Hats"]);
}

#[tokio::test]
async fn test_projection_pages_after_distinct() {
    let db = setup_db().await;
    insert(&db, catalog()).await;

    let spec = Specification::<Product>::new()
        .order_by_ascending(ProductField::Brand)
        .distinct()
        .paging(1, 2)
        .select(Projection::<Product, String>::field(ProductField::Brand));
    let brands = repository(&db).get_all_projected(&spec).await.unwrap();

    assert_eq!(brands, vec!["NetCore", "React"]);
}

#[tokio::test]
async fn test_projected_distinct_and_paging_match_in_memory() {
    let db = setup_db().await;
    let stored = insert(
        &db,
        vec![
            product("First", "A", "Boards", 1),
            product("Second", "B", "Boards", 2),
            product("Third", "A", "Boards", 3),
        ],
    )
    .await;
    let repo = repository(&db);

    let brands = Specification::<Product>::new()
        .distinct()
        .select(Projection::<Product, String>::field(ProductField::Brand));
    let expected =
        SpecificationEvaluator::get_projected_query(MemoryQuery::new(stored.clone()), &brands)
            .into_vec()
            .unwrap();
    let mut found = repo.get_all_projected(&brands).await.unwrap();
    found.sort();
    assert_eq!(found, vec!["A", "B"]);
    assert_eq!(expected, vec!["A", "B"]);

    let whole = Specification::<Product>::new()
        .order_by_ascending(ProductField::Price)
        .distinct()
        .paging(1, 1)
        .select(Projection::identity());
    let expected = SpecificationEvaluator::get_projected_query(MemoryQuery::new(stored), &whole)
        .into_vec()
        .unwrap();
    let found = repo.get_all_projected(&whole).await.unwrap();
    assert_eq!(found, expected);
    assert_eq!(found[0].name, "Second");
}

#[tokio::test]
async fn test_identity_projection_returns_entities() {
    let db = setup_db().await;
    insert(&db, catalog()).await;

    let spec = Specification::<Product>::with_criteria(Criteria::eq(ProductField::Type, "Boards"))
        .select(Projection::identity());
    let boards = repository(&db).get_all_projected(&spec).await.unwrap();
    assert_eq!(boards.len(), 3);

    let first = repository(&db).get_projected(&spec).await.unwrap();
    assert!(first.is_some());
}

#[tokio::test]
async fn test_empty_commit_is_false() {
    let db = setup_db().await;
    let mut repo = repository(&db);
    assert!(!repo.commit().await.unwrap());
}

#[tokio::test]
async fn test_noop_commit_keeps_changes() {
    let db = setup_db().await;
    let mut repo = repository(&db);

    let ghost = Product {
        id: 99,
        ..product("Ghost", "Nobody", "Boards", 1)
    };
    repo.update(ghost.clone());

    assert!(!repo.commit().await.unwrap());
    assert_eq!(repo.pending_changes(), &[Change::Update(ghost)]);
    assert_eq!(repo.count(&Specification::new()).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_and_delete_commit() {
    let db = setup_db().await;
    let inserted = insert(&db, catalog()).await;
    let mut repo = repository(&db);

    let mut changed = inserted[0].clone();
    changed.name = "Renamed Board".to_string();
    changed.price = Decimal::from(99);
    repo.update(changed.clone());
    repo.delete(inserted[1].clone());

    assert!(repo.commit().await.unwrap());
    assert!(repo.pending_changes().is_empty());

    assert_eq!(repo.get_by_id(changed.id).await.unwrap(), Some(changed));
    assert!(!repo.exists(inserted[1].id).await.unwrap());
    assert_eq!(repo.count(&Specification::new()).await.unwrap(), 5);
}

#[tokio::test]
async fn test_staged_changes_invisible_until_commit() {
    let db = setup_db().await;
    let mut repo = repository(&db);

    repo.create(product("Staged", "Angular", "Boards", 5));
    assert_eq!(repo.count(&Specification::new()).await.unwrap(), 0);

    assert!(repo.commit().await.unwrap());
    assert_eq!(repo.count(&Specification::new()).await.unwrap(), 1);
}

#[tokio::test]
async fn test_cancelled_context_keeps_changes() {
    let db = setup_db().await;
    let token = CancellationToken::new();
    let mut repo =
        Repository::<Product>::new(StoreContext::new(db.clone()).with_cancellation(token.clone()));

    repo.create(product("Late", "Angular", "Boards", 5));
    token.cancel();

    let result = repo.commit().await;
    assert!(matches!(result, Err(AppError::Cancelled)));
    assert_eq!(repo.pending_changes().len(), 1);
    let stored = repository(&db).count(&Specification::new()).await.unwrap();
    assert_eq!(stored, 0);
}
