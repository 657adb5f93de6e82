//! JWT authentication middleware.
//!
//! Validates the bearer token, loads the token's user and attaches it to the
//! request. The token only identifies the user; the role is read from the
//! user row on each request. What the caller may do is decided later by the
//! authorization gate.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::validate_access_token;

pub use crate::authz::AuthUser;

/// Rejects the request with 401 unless it carries a valid
/// `Authorization: Bearer <token>` header for a user that still exists.
///
/// # Example
/// ```ignore
/// OpenApiRouter::new()
///     .routes(routes!(handler))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let claims = validate_access_token(token, &state.jwt_config.secret)?;
    let user_id = claims.user_id()?;
    let auth_user = state.services.users.authenticate(user_id).await?;

    tracing::debug!(user_id = auth_user.user_id, role = %auth_user.role, "Authenticated request");
    request.extensions_mut().insert(auth_user);

    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}
