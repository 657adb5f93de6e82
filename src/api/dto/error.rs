//! Error response DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry of the error envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    /// Offending field for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Error envelope: `{ "errors": [{ "message", ... }] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorDetail>,
}

impl ErrorResponse {
    /// Creates a single-error response with code and message.
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            errors: vec![ErrorDetail {
                message: message.into(),
                code: Some(code.to_string()),
                field: None,
            }],
        }
    }

    /// Creates a response with one entry per failing field.
    pub fn fields<I, F, M>(code: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (F, M)>,
        F: Into<String>,
        M: Into<String>,
    {
        Self {
            errors: fields
                .into_iter()
                .map(|(field, message)| ErrorDetail {
                    message: message.into(),
                    code: Some(code.to_string()),
                    field: Some(field.into()),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_error_shape() {
        let json = serde_json::to_value(ErrorResponse::new("NOT_FOUND", "missing")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "errors": [{ "message": "missing", "code": "NOT_FOUND" }] })
        );
    }

    #[test]
    fn test_field_errors_shape() {
        let response = ErrorResponse::fields(
            "VALIDATION_ERROR",
            [("slug", "Slug is required"), ("price", "Price cannot be negative")],
        );
        assert_eq!(response.errors.len(), 2);
        assert_eq!(response.errors[1].field.as_deref(), Some("price"));
    }
}
