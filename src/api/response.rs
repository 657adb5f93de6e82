//! Responses for cached reads.

use axum::{
    Json,
    http::{HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::cache::Cached;

/// `HIT` when the body was served from the cache, `MISS` otherwise.
pub const X_CACHE_HEADER: HeaderName = HeaderName::from_static("x-cache");

impl<T: Serialize> IntoResponse for Cached<T> {
    fn into_response(self) -> Response {
        let status = HeaderValue::from_static(self.status());
        let mut response = Json(self.value).into_response();
        response.headers_mut().insert(X_CACHE_HEADER, status);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_header() {
        let response = Cached::hit(vec![1, 2, 3]).into_response();
        assert_eq!(response.headers()["x-cache"], "HIT");
    }

    #[test]
    fn test_miss_header() {
        let response = Cached::miss("fresh").into_response();
        assert_eq!(response.headers()["x-cache"], "MISS");
        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }
}
