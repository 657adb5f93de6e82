//! Application state for the Axum router.
//!
//! Contains shared services and resources that are accessible across all
//! request handlers.

use std::sync::Arc;

use crate::authz::{AuthorizationGate, RolePermissions};
use crate::cache::CacheManager;
use crate::config::{AuthzConfig, JwtConfig};
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::Services;

/// Application state containing all shared services and resources.
///
/// Cloning is cheap since services, pool and cache share `Arc` handles.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Database pool, used directly by readiness checks. `None` when the
    /// state is backed by non-database stores.
    pub db_pool: Option<AsyncDbPool>,
    pub cache: CacheManager,
    /// JWT configuration for validating bearer tokens
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// Creates PostgreSQL-backed state with a role-table permission resolver.
    ///
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let cache = CacheManager::new(&settings.cache).await?;
    /// let state = AppState::new(pool, cache, settings.jwt.clone(), &settings.authz);
    /// ```
    pub fn new(
        pool: AsyncDbPool,
        cache: CacheManager,
        jwt_config: JwtConfig,
        authz: &AuthzConfig,
    ) -> Self {
        let permissions = RolePermissions::from_config(authz);
        tracing::info!(roles = permissions.role_count(), "Permission table loaded");
        let gate = AuthorizationGate::new(Arc::new(permissions));
        let mut state = Self::from_parts(Repositories::new(pool.clone()), cache, gate, jwt_config);
        state.db_pool = Some(pool);
        state
    }

    /// Builds state from already constructed repositories and gate.
    pub fn from_parts(
        repos: Repositories,
        cache: CacheManager,
        gate: AuthorizationGate,
        jwt_config: JwtConfig,
    ) -> Self {
        Self {
            services: Services::new(repos, cache.clone(), gate),
            db_pool: None,
            cache,
            jwt_config,
        }
    }
}
