//! Service layer for business logic operations.
//!
//! Services run the action pipeline: authorization, then a cached read or a
//! committed write followed by cache invalidation.

mod product_service;
mod user_service;

pub use product_service::{ARCHIVED_PRODUCTS_RESOURCE, PRODUCTS_RESOURCE, ProductService};
pub use user_service::{USERS_RESOURCE, UserService};

use crate::authz::AuthorizationGate;
use crate::cache::CacheManager;
use crate::error::AppResult;
use crate::repositories::Repositories;

/// Input of a gated action.
///
/// Services call [`ActionInput::checked`] after the caller is authorized, so
/// request payloads run their `validator` rules only for permitted callers.
/// Already-built model values pass through unchanged.
pub trait ActionInput<T> {
    fn checked(self) -> AppResult<T>;
}

impl<T> ActionInput<T> for T {
    fn checked(self) -> AppResult<T> {
        Ok(self)
    }
}

/// Aggregates all services for convenient access.
///
/// Cloning is cheap: repositories, cache and gate are all shared handles.
#[derive(Clone)]
pub struct Services {
    pub products: ProductService,
    pub users: UserService,
}

impl Services {
    pub fn new(repos: Repositories, cache: CacheManager, gate: AuthorizationGate) -> Self {
        Self {
            products: ProductService::new(repos.products, cache.clone(), gate.clone()),
            users: UserService::new(repos.users, cache, gate),
        }
    }
}
