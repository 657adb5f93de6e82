//! Product admin handlers.
//!
//! Reads answer with an `x-cache` header. Every handler passes the caller to
//! the service, which checks the required permission first. Payloads are
//! only deserialized here; their rules run in the service after that check.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::PRODUCT_TAG;
use crate::api::dto::{
    CreateProductRequest, ErrorResponse, PagedResponse, ProductListParams, ProductResponse,
    RestoreProductRequest, UpdateProductRequest,
};
use crate::api::middleware::AuthUser;
use crate::cache::Cached;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::{JsonPayload, QueryPayload};

/// Routes:
/// - GET /              - List active products
/// - POST /             - Create product
/// - GET /archived      - List archived products
/// - POST /restore      - Restore an archived product
/// - DELETE /cache      - Purge all cached product reads
/// - GET /{id}          - Get active product
/// - PUT /{id}          - Update active product
/// - DELETE /{id}       - Archive product
/// - DELETE /{id}/cache - Purge cached reads of one product
pub fn product_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_products, create_product))
        .routes(routes!(list_archived_products))
        .routes(routes!(restore_product))
        .routes(routes!(clear_products_cache))
        .routes(routes!(get_product, update_product, archive_product))
        .routes(routes!(clear_product_cache))
}

#[utoipa::path(
    get,
    path = "/",
    tag = PRODUCT_TAG,
    params(ProductListParams),
    responses(
        (status = 200, description = "Paginated active products", body = PagedResponse<ProductResponse>,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 403, description = "Missing api::shop::products.index", body = ErrorResponse),
        (status = 422, description = "Invalid query parameters", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_products(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    QueryPayload(params): QueryPayload<ProductListParams>,
) -> AppResult<Cached<PagedResponse<ProductResponse>>> {
    let page = state.services.products.list(&caller, params).await?;
    Ok(page.map(PagedResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = PRODUCT_TAG,
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductResponse),
        (status = 403, description = "Missing api::shop::products.create", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonPayload(payload): JsonPayload<CreateProductRequest>,
) -> AppResult<(StatusCode, Json<ProductResponse>)> {
    let product = state.services.products.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from(product))))
}

#[utoipa::path(
    get,
    path = "/archived",
    tag = PRODUCT_TAG,
    params(ProductListParams),
    responses(
        (status = 200, description = "Paginated archived products", body = PagedResponse<ProductResponse>,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 403, description = "Missing api::shop::products.archived", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_archived_products(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    QueryPayload(params): QueryPayload<ProductListParams>,
) -> AppResult<Cached<PagedResponse<ProductResponse>>> {
    let page = state.services.products.list_archived(&caller, params).await?;
    Ok(page.map(PagedResponse::from))
}

#[utoipa::path(
    post,
    path = "/restore",
    tag = PRODUCT_TAG,
    request_body = RestoreProductRequest,
    responses(
        (status = 200, description = "Product restored", body = ProductResponse),
        (status = 403, description = "Missing api::shop::products.restore", body = ErrorResponse),
        (status = 404, description = "No archived product with this id", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn restore_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonPayload(payload): JsonPayload<RestoreProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.services.products.restore(&caller, payload).await?;
    Ok(Json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/cache",
    tag = PRODUCT_TAG,
    responses(
        (status = 204, description = "Product cache purged"),
        (status = 403, description = "Missing api::shop::products.clearCache", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn clear_products_cache(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> AppResult<StatusCode> {
    state.services.products.clear_cache(&caller, None).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 200, description = "Active product", body = ProductResponse,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 403, description = "Missing api::shop::products.show", body = ErrorResponse),
        (status = 404, description = "No active product with this id", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<Cached<ProductResponse>> {
    let product = state.services.products.get(&caller, id).await?;
    Ok(product.map(ProductResponse::from))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product id")),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductResponse),
        (status = 403, description = "Missing api::shop::products.update", body = ErrorResponse),
        (status = 404, description = "No active product with this id", body = ErrorResponse),
        (status = 409, description = "Slug already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    JsonPayload(payload): JsonPayload<UpdateProductRequest>,
) -> AppResult<Json<ProductResponse>> {
    let product = state.services.products.update(&caller, id, payload).await?;
    Ok(Json(ProductResponse::from(product)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Product archived"),
        (status = 403, description = "Missing api::shop::products.archive", body = ErrorResponse),
        (status = 404, description = "No active product with this id", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn archive_product(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.products.archive(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    delete,
    path = "/{id}/cache",
    tag = PRODUCT_TAG,
    params(("id" = i32, Path, description = "Product id")),
    responses(
        (status = 204, description = "Cached reads of the product purged"),
        (status = 403, description = "Missing api::shop::products.clearCache", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn clear_product_cache(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.products.clear_cache(&caller, Some(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}
