//! Permission checks run before any cache or store access.

mod common;

use std::sync::atomic::Ordering;

use common::{Harness, admin, caller, new_product};
use emporium::error::AppError;
use emporium::models::{ProductQuery, UpdateProduct, UpdateUser, UserQuery};

fn assert_forbidden<T: std::fmt::Debug>(result: Result<T, AppError>, permission: &str) {
    match result {
        Err(AppError::Forbidden { message }) => assert!(
            message.contains(permission),
            "message '{}' should name {}",
            message,
            permission
        ),
        other => panic!("Expected Forbidden, got {:?}", other),
    }
}

#[tokio::test]
async fn test_denied_read_never_touches_cache_or_store() {
    let h = Harness::new();
    let nobody = caller(9, "nobody");

    assert_forbidden(
        h.state.services.products.list(&nobody, ProductQuery::default()).await,
        "api::shop::products.index",
    );
    assert_forbidden(
        h.state.services.products.get(&nobody, 1).await,
        "api::shop::products.show",
    );
    assert_forbidden(
        h.state.services.users.list(&nobody, UserQuery::default()).await,
        "api::users.index",
    );

    assert_eq!(h.store.total_ops(), 0);
    assert_eq!(h.products.reads(), 0);
}

#[tokio::test]
async fn test_denied_write_does_not_invalidate() {
    let h = Harness::new();
    let created = h
        .state
        .services
        .products
        .create(&admin(), new_product("desk"))
        .await
        .unwrap();
    h.state
        .services
        .products
        .list(&admin(), ProductQuery::default())
        .await
        .unwrap();
    let ops_before = h.store.total_ops();

    let viewer = caller(2, "viewer");
    let changes = UpdateProduct {
        title: Some("Hijacked".to_string()),
        ..Default::default()
    };
    assert_forbidden(
        h.state.services.products.update(&viewer, created.id, changes).await,
        "api::shop::products.update",
    );
    assert_forbidden(
        h.state.services.products.clear_cache(&viewer, None).await,
        "api::shop::products.clearCache",
    );

    assert_eq!(h.store.total_ops(), ops_before);
    assert_eq!(h.store.pattern_deletes.load(Ordering::SeqCst), 1);
    assert_eq!(h.store.keys(), vec!["products"]);
}

#[tokio::test]
async fn test_viewer_reads_but_cannot_archive() {
    let h = Harness::new();
    let created = h
        .state
        .services
        .products
        .create(&admin(), new_product("desk"))
        .await
        .unwrap();
    let viewer = caller(2, "viewer");

    let fetched = h.state.services.products.get(&viewer, created.id).await.unwrap();
    assert_eq!(fetched.value.slug, "desk");

    assert_forbidden(
        h.state.services.products.archive(&viewer, created.id).await,
        "api::shop::products.archive",
    );
    assert_forbidden(
        h.state
            .services
            .products
            .list_archived(&viewer, ProductQuery::default())
            .await,
        "api::shop::products.archived",
    );
}

#[tokio::test]
async fn test_unknown_role_has_no_permissions() {
    let h = Harness::new();
    let stranger = caller(3, "auditor");

    assert_forbidden(
        h.state.services.products.create(&stranger, new_product("x")).await,
        "api::shop::products.create",
    );
    assert_forbidden(
        h.state.services.users.delete(&stranger, 1).await,
        "api::users.destroy",
    );
    assert_eq!(h.store.total_ops(), 0);
}

#[tokio::test]
async fn test_profile_actions_need_no_permission() {
    let h = Harness::new();
    h.users.seed(3, "self@example.com", "nobody");
    let me = caller(3, "nobody");

    let user = h.state.services.users.me(&me).await.unwrap();
    assert_eq!(user.email, "self@example.com");

    let updated = h
        .state
        .services
        .users
        .update_profile(&me, Some("Ada".to_string()), None)
        .await
        .unwrap();
    assert_eq!(updated.first_name, "Ada");
    assert_eq!(updated.last_name, "User");
}

#[tokio::test]
async fn test_authenticate_reads_current_role() {
    let h = Harness::new();
    h.users.seed(8, "ops@example.com", "viewer");
    let users = &h.state.services.users;

    let resolved = users.authenticate(8).await.unwrap();
    assert_eq!(resolved.role, "viewer");
    assert_eq!(resolved.email, "ops@example.com");

    users
        .update(
            &admin(),
            8,
            UpdateUser {
                role: Some("admin".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(users.authenticate(8).await.unwrap().role, "admin");

    users.delete(&admin(), 8).await.unwrap();
    assert!(matches!(
        users.authenticate(8).await,
        Err(AppError::Unauthorized { .. })
    ));
}
