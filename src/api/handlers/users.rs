//! User admin handlers.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::USER_TAG;
use crate::api::dto::{
    CreateUserRequest, ErrorResponse, PagedResponse, UpdateUserRequest, UserListParams,
    UserResponse,
};
use crate::api::middleware::AuthUser;
use crate::cache::Cached;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::{JsonPayload, QueryPayload};

/// Routes:
/// - GET /        - List users
/// - POST /       - Create user
/// - GET /{id}    - Get user
/// - PUT /{id}    - Update user
/// - DELETE /{id} - Delete user
pub fn user_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}

#[utoipa::path(
    get,
    path = "/",
    tag = USER_TAG,
    params(UserListParams),
    responses(
        (status = 200, description = "Paginated users", body = PagedResponse<UserResponse>,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 403, description = "Missing api::users.index", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_users(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    QueryPayload(params): QueryPayload<UserListParams>,
) -> AppResult<Cached<PagedResponse<UserResponse>>> {
    let page = state.services.users.list(&caller, params).await?;
    Ok(page.map(PagedResponse::from))
}

#[utoipa::path(
    post,
    path = "/",
    tag = USER_TAG,
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 403, description = "Missing api::users.create", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn create_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    JsonPayload(payload): JsonPayload<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let user = state.services.users.create(&caller, payload).await?;
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = UserResponse,
            headers(("x-cache" = String, description = "HIT or MISS"))),
        (status = 403, description = "Missing api::users.show", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<Cached<UserResponse>> {
    let user = state.services.users.get(&caller, id).await?;
    Ok(user.map(UserResponse::from))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 403, description = "Missing api::users.update", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
    JsonPayload(payload): JsonPayload<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.update(&caller, id, payload).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Missing api::users.destroy", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_user(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.users.delete(&caller, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
