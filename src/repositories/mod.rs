//! Repository layer for data access operations.
//!
//! Each resource has an async store trait and a PostgreSQL implementation.
//! Services depend on the traits so tests can swap in in-memory stores.

mod product_repo;
mod user_repo;

pub use product_repo::{ProductRepository, ProductStore};
pub use user_repo::{UserRepository, UserStore};

use std::sync::Arc;

use crate::db::AsyncDbPool;

/// Aggregates all repositories for convenient access.
///
/// Cloning only clones the `Arc` handles.
#[derive(Clone)]
pub struct Repositories {
    pub products: Arc<dyn ProductStore>,
    pub users: Arc<dyn UserStore>,
}

impl Repositories {
    /// Creates PostgreSQL-backed repositories sharing one pool.
    pub fn new(pool: AsyncDbPool) -> Self {
        Self {
            products: Arc::new(ProductRepository::new(pool.clone())),
            users: Arc::new(UserRepository::new(pool)),
        }
    }

    pub fn from_stores(products: Arc<dyn ProductStore>, users: Arc<dyn UserStore>) -> Self {
        Self { products, users }
    }
}

/// Escapes `LIKE` wildcards and wraps the term for a substring match.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Row offset for a 1-based page.
pub(crate) fn page_offset(page: i64, limit: i64) -> i64 {
    (page.max(1) - 1) * limit
}
