//! Router configuration for the API.
//!
//! Routes are registered on `OpenApiRouter`s so the OpenAPI document is built
//! from the same tree that serves requests.

use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDoc;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    REQUEST_ID_HEADER, auth_middleware, error_envelope_middleware, logging_middleware,
    request_id_middleware,
};
use crate::api::response::X_CACHE_HEADER;
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. Request ID - generates or propagates `x-request-id`
/// 2. Logging - logs the request with its id
/// 3. CORS and compression
/// 4. Error envelope - rewraps framework plain-text errors as JSON
/// 5. Auth (protected routes only) - attaches the caller
///
/// # Routes
/// - `/api/health*` - Health probes, public
/// - `/api/me` - Current user profile
/// - `/api/admin/products` - Product administration
/// - `/api/admin/users` - User administration
/// - `/swagger-ui` - API documentation
pub fn create_router(state: AppState) -> Router {
    let (router, api) = api_router(&state);

    Router::new()
        .merge(router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .layer(middleware::from_fn(error_envelope_middleware))
        .layer(CompressionLayer::new())
        .layer(cors_layer())
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .with_state(state)
}

/// The `/api` tree and its OpenAPI document.
pub fn api_router(state: &AppState) -> (Router<AppState>, OpenApiDoc) {
    let protected = OpenApiRouter::new()
        .nest("/me", handlers::me::me_routes())
        .nest("/admin/products", handlers::products::product_routes())
        .nest("/admin/users", handlers::users::user_routes())
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let api_routes = OpenApiRouter::new()
        .merge(handlers::health::health_routes())
        .merge(protected);

    OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .split_for_parts()
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .expose_headers([X_CACHE_HEADER, HeaderName::from_static(REQUEST_ID_HEADER)])
}
