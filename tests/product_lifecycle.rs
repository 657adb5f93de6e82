//! Active/archived transitions of products.

mod common;

use common::{Harness, admin, new_product};
use emporium::error::AppError;
use emporium::models::{ProductQuery, UpdateProduct};

fn assert_not_found<T: std::fmt::Debug>(result: Result<T, AppError>) {
    match result {
        Err(AppError::NotFound { entity, .. }) => assert_eq!(entity, "product"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn test_archive_hides_product_from_active_reads() {
    let h = Harness::new();
    let products = &h.state.services.products;
    let created = products.create(&admin(), new_product("desk")).await.unwrap();

    let archived = products.archive(&admin(), created.id).await.unwrap();
    assert!(archived.is_archived());

    assert_not_found(products.get(&admin(), created.id).await);
    let active = products.list(&admin(), ProductQuery::default()).await.unwrap();
    assert_eq!(active.value.total, 0);
    let archived = products.list_archived(&admin(), ProductQuery::default()).await.unwrap();
    assert_eq!(archived.value.items[0].id, created.id);
}

#[tokio::test]
async fn test_repeated_transitions_are_not_found() {
    let h = Harness::new();
    let products = &h.state.services.products;
    let created = products.create(&admin(), new_product("desk")).await.unwrap();

    assert_not_found(products.restore(&admin(), created.id).await);

    products.archive(&admin(), created.id).await.unwrap();
    assert_not_found(products.archive(&admin(), created.id).await);

    products.restore(&admin(), created.id).await.unwrap();
    assert_not_found(products.restore(&admin(), created.id).await);
}

#[tokio::test]
async fn test_archived_product_cannot_be_updated() {
    let h = Harness::new();
    let products = &h.state.services.products;
    let created = products.create(&admin(), new_product("desk")).await.unwrap();
    products.archive(&admin(), created.id).await.unwrap();

    let changes = UpdateProduct {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    assert_not_found(products.update(&admin(), created.id, changes).await);
}

#[tokio::test]
async fn test_restore_returns_product_to_active_scope() {
    let h = Harness::new();
    let products = &h.state.services.products;
    let created = products.create(&admin(), new_product("desk")).await.unwrap();
    products.archive(&admin(), created.id).await.unwrap();

    let restored = products.restore(&admin(), created.id).await.unwrap();
    assert!(!restored.is_archived());

    let fetched = products.get(&admin(), created.id).await.unwrap();
    assert_eq!(fetched.value.id, created.id);
}

#[tokio::test]
async fn test_create_assigns_caller_as_owner() {
    let h = Harness::new();
    let mut product = new_product("desk");
    product.user_id = 999;

    let created = h.state.services.products.create(&admin(), product).await.unwrap();
    assert_eq!(created.user_id, admin().user_id);
}

#[tokio::test]
async fn test_unknown_product_is_not_found_and_not_cached() {
    let h = Harness::new();
    assert_not_found(h.state.services.products.get(&admin(), 42).await);
    assert!(h.store.keys().is_empty());
}
