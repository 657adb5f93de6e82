//! HTTP API layer: handlers, middleware, DTOs and the router.

pub mod doc;
pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;

pub use response::X_CACHE_HEADER;
pub use routes::create_router;
