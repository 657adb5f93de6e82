//! Current user (me) endpoints.
//!
//! Any authenticated caller may read and edit their own profile. Email and
//! password changes require the current password.

use axum::{Extension, Json, extract::State, http::StatusCode};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::ME_TAG;
use crate::api::dto::{
    ChangeEmailRequest, ChangePasswordRequest, ErrorResponse, UpdateProfileRequest, UserResponse,
};
use crate::api::middleware::AuthUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::ValidatedJson;

/// Routes:
/// - GET /          - Current user
/// - PATCH /        - Update first/last name
/// - PUT /email     - Change email
/// - PUT /password  - Change password
pub fn me_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(get_me, update_me))
        .routes(routes!(change_email))
        .routes(routes!(change_password))
}

#[utoipa::path(
    get,
    path = "/",
    tag = ME_TAG,
    responses(
        (status = 200, description = "Current user information", body = UserResponse),
        (status = 401, description = "Invalid or missing token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> AppResult<Json<UserResponse>> {
    let user = state.services.users.me(&caller).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    patch,
    path = "/",
    tag = ME_TAG,
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .update_profile(&caller, payload.first_name, payload.last_name)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/email",
    tag = ME_TAG,
    request_body = ChangeEmailRequest,
    responses(
        (status = 200, description = "Email changed", body = UserResponse),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 409, description = "Email already taken", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn change_email(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ChangeEmailRequest>,
) -> AppResult<Json<UserResponse>> {
    let user = state
        .services
        .users
        .change_email(&caller, &payload.current_password, payload.email)
        .await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    put,
    path = "/password",
    tag = ME_TAG,
    request_body = ChangePasswordRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Current password is incorrect", body = ErrorResponse),
        (status = 422, description = "Validation failed", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn change_password(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
    ValidatedJson(payload): ValidatedJson<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    state
        .services
        .users
        .change_password(&caller, &payload.current_password, &payload.new_password)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
