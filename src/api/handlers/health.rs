//! Health check endpoint handlers.
//!
//! The database check talks to the pool directly, bypassing the service
//! layer. A failing cache only degrades the service since reads fall back to
//! the store.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::Json};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;

/// Routes:
/// - GET /health       - Component report
/// - GET /health/ready - Readiness probe
/// - GET /health/live  - Liveness probe
pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(health_check))
        .routes(routes!(readiness_check))
        .routes(routes!(liveness_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let response = build_report(&state).await;
    let code = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (code, Json(response))
}

/// Ready once the database answers; the cache does not gate readiness.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Service is ready"),
        (status = 503, description = "Service is not ready")
    ),
    tag = HEALTH_TAG
)]
async fn readiness_check(State(state): State<AppState>) -> StatusCode {
    match check_database(&state).await {
        Some(check) if check.status == HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::OK,
    }
}

#[utoipa::path(
    get,
    path = "/health/live",
    responses(
        (status = 200, description = "Service is alive")
    ),
    tag = HEALTH_TAG
)]
async fn liveness_check() -> StatusCode {
    StatusCode::OK
}

async fn build_report(state: &AppState) -> HealthResponse {
    let mut checks = BTreeMap::new();
    let mut status = HealthStatus::Healthy;

    if let Some(db) = check_database(state).await {
        status = status.worst(db.status);
        checks.insert("database".to_string(), db);
    }

    let cache = check_cache(state).await;
    status = status.worst(cache.status);
    checks.insert("cache".to_string(), cache);

    HealthResponse {
        status,
        version: crate::pkg_version().to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        checks,
    }
}

/// `None` when the state carries no database pool.
async fn check_database(state: &AppState) -> Option<ComponentHealth> {
    use diesel_async::RunQueryDsl;

    let pool = state.db_pool.as_ref()?;
    let start = Instant::now();

    let result = match pool.get().await {
        Ok(mut conn) => diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| format!("Query failed: {}", e)),
        Err(e) => Err(format!("Connection failed: {}", e)),
    };

    Some(match result {
        Ok(()) => component(HealthStatus::Healthy, "Connected".to_string(), start),
        Err(message) => {
            tracing::warn!(error = %message, "Database health check failed");
            component(HealthStatus::Unhealthy, message, start)
        }
    })
}

async fn check_cache(state: &AppState) -> ComponentHealth {
    let start = Instant::now();
    match state.cache.ping().await {
        Ok(()) => component(
            HealthStatus::Healthy,
            state.cache.backend_name().to_string(),
            start,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            component(
                HealthStatus::Degraded,
                format!("{}: {}", state.cache.backend_name(), e),
                start,
            )
        }
    }
}

fn component(status: HealthStatus, message: String, start: Instant) -> ComponentHealth {
    ComponentHealth {
        status,
        message: Some(message),
        response_time_ms: Some(start.elapsed().as_millis() as u64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness_check() {
        assert_eq!(liveness_check().await, StatusCode::OK);
    }

    #[test]
    fn test_component_records_elapsed_time() {
        let health = component(HealthStatus::Degraded, "memory".to_string(), Instant::now());
        assert_eq!(health.status, HealthStatus::Degraded);
        assert_eq!(health.message.as_deref(), Some("memory"));
        assert!(health.response_time_ms.is_some());
    }
}
