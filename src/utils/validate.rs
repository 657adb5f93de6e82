//! Request extractors.
//!
//! `ValidatedJson` deserializes and then runs `validator` rules.
//! `JsonPayload`/`QueryPayload` only deserialize, for gated actions whose
//! rules run after the permission check.
//!
//! Deserialization failures become `AppError::BadRequest`; rule failures
//! become `AppError::ValidationErrors` with one entry per failing field.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonPayload<T>(pub T);

impl<T, S> FromRequest<S> for JsonPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> AppResult<Self> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(JsonPayload(value))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryPayload<T>(pub T);

impl<T, S> FromRequestParts<S> for QueryPayload<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> AppResult<Self> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e: QueryRejection| AppError::from(e))?;
        Ok(QueryPayload(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, header};
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Validate)]
    struct TestPayload {
        #[validate(length(min = 1, max = 50, message = "Slug must be between 1 and 50 characters"))]
        slug: String,
        #[validate(email(message = "Invalid email format"))]
        email: String,
    }

    #[derive(Debug, Deserialize, Validate)]
    struct TestQuery {
        #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
        limit: Option<i64>,
    }

    fn json_request(body: &str) -> Request {
        Request::builder()
            .method(Method::POST)
            .uri("/test")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_json() {
        let request = json_request(r#"{"slug":"desk","email":"ops@example.com"}"#);
        let ValidatedJson(payload) = ValidatedJson::<TestPayload>::from_request(request, &())
            .await
            .unwrap();
        assert_eq!(payload.slug, "desk");
    }

    #[tokio::test]
    async fn test_json_rule_failures_collect_all_fields() {
        let request = json_request(r#"{"slug":"","email":"nope"}"#);
        match ValidatedJson::<TestPayload>::from_request(request, &()).await {
            Err(AppError::ValidationErrors { errors }) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["email", "slug"]);
            }
            other => panic!("Expected ValidationErrors, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_payload_skips_rules() {
        let request = json_request(r#"{"slug":"","email":"nope"}"#);
        let JsonPayload(payload) = JsonPayload::<TestPayload>::from_request(request, &())
            .await
            .unwrap();
        assert!(payload.validate().is_err());

        let request = json_request(r#"{"slug":"#);
        assert!(matches!(
            JsonPayload::<TestPayload>::from_request(request, &()).await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_payload_skips_rules() {
        let request = Request::builder()
            .uri("/test?limit=500")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let QueryPayload(query) = QueryPayload::<TestQuery>::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(query.limit, Some(500));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let request = json_request(r#"{"slug":"#);
        assert!(matches!(
            ValidatedJson::<TestPayload>::from_request(request, &()).await,
            Err(AppError::BadRequest { .. })
        ));
    }

    #[tokio::test]
    async fn test_query_type_mismatch_is_bad_request() {
        let request = Request::builder()
            .uri("/test?limit=many")
            .body(Body::empty())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        assert!(matches!(
            QueryPayload::<TestQuery>::from_request_parts(&mut parts, &()).await,
            Err(AppError::BadRequest { .. })
        ));
    }
}
