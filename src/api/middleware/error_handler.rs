//! Error handler for converting AppError to HTTP responses.
//!
//! Every failure leaves the API as the `{ "errors": [...] }` envelope. Server
//! side failures are logged with their source and answered with a generic
//! message.

use axum::{
    Json,
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::api::dto::ErrorResponse;
use crate::error::AppError;

/// Largest framework error body that is copied into the envelope.
const MAX_PLAIN_ERROR_BODY: usize = 4096;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let code = error_to_code(&self);

        if status.is_server_error() {
            tracing::error!(error = ?self, status = status.as_u16(), "Request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "Request rejected");
        }

        let body = match &self {
            AppError::NotFound { entity, field, value } => ErrorResponse::new(
                code,
                format!("{} with {} '{}' not found", entity, field, value),
            ),
            AppError::Duplicate { entity, field, value } => ErrorResponse::fields(
                code,
                [(
                    field.clone(),
                    format!("{} with {} '{}' already exists", entity, field, value),
                )],
            ),
            AppError::Validation { field, reason } => {
                ErrorResponse::fields(code, [(field.clone(), reason.clone())])
            }
            AppError::ValidationErrors { errors } => ErrorResponse::fields(
                code,
                errors.iter().map(|e| (e.field.clone(), e.message.clone())),
            ),
            AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(code, message.clone()),
            AppError::ConnectionPool { .. } => {
                ErrorResponse::new(code, "Service temporarily unavailable")
            }
            AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
                ErrorResponse::new(code, "An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Duplicate { .. } => StatusCode::CONFLICT,
        AppError::Validation { .. } => StatusCode::BAD_REQUEST,
        AppError::ValidationErrors { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::Database { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Duplicate { .. } => "DUPLICATE_ENTRY",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

/// Rewraps plain-text error responses produced by the framework (unknown
/// routes, wrong methods, bad path parameters) into the error envelope.
pub async fn error_envelope_middleware(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"));
    if is_json {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_PLAIN_ERROR_BODY)
        .await
        .unwrap_or_default();
    let original = String::from_utf8_lossy(&bytes).trim().to_string();

    let message = if original.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string()
    } else {
        original
    };

    let code = status
        .canonical_reason()
        .map(|r| r.to_uppercase().replace(' ', "_"))
        .unwrap_or_else(|| "ERROR".to_string());

    let mut response = (status, Json(ErrorResponse::new(&code, message))).into_response();
    for name in [header::ALLOW, header::WWW_AUTHENTICATE] {
        if let Some(value) = parts.headers.get(&name) {
            response.headers_mut().insert(name, value.clone());
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationFieldError;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::not_found("product", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::Forbidden {
                message: "no".into()
            }),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            error_to_status_code(&AppError::ValidationErrors { errors: vec![] }),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            error_to_status_code(&AppError::Duplicate {
                entity: "product".into(),
                field: "slug".into(),
                value: "desk".into()
            }),
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_validation_errors_render_per_field() {
        let response = AppError::ValidationErrors {
            errors: vec![
                ValidationFieldError::new("price", "Price cannot be negative"),
                ValidationFieldError::new("slug", "Slug is required"),
            ],
        }
        .into_response();

        let json = body_json(response).await;
        assert_eq!(json["errors"].as_array().unwrap().len(), 2);
        assert_eq!(json["errors"][0]["field"], "price");
        assert_eq!(json["errors"][0]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_database_error_message_is_generic() {
        let response = AppError::Database {
            operation: "insert".into(),
            source: anyhow::anyhow!("relation \"products\" does not exist"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(json["errors"][0]["message"], "An internal error occurred");
    }
}
