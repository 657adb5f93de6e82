//! Cache manager that dispatches to the configured backend.

use std::sync::Arc;

use crate::cache::memory::MemoryStore;
use crate::cache::noop::NoOpStore;
use crate::cache::redis::RedisStore;
use crate::cache::{CacheError, CacheStore, InvalidationPattern};
use crate::config::settings::{CacheBackend, CacheConfig};

/// Handle to the configured cache store.
///
/// Built once at startup and carried in `AppState`; clones share the backend.
#[derive(Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheStore>,
}

impl CacheManager {
    /// Create a cache manager from configuration. A disabled cache gets the
    /// no-op store.
    pub async fn new(config: &CacheConfig) -> Result<Self, CacheError> {
        let backend: Arc<dyn CacheStore> = if !config.enabled {
            Arc::new(NoOpStore)
        } else {
            match config.backend {
                CacheBackend::Memory => Arc::new(MemoryStore::with_capacity(config.max_entries)),
                CacheBackend::Redis => Arc::new(RedisStore::new(&config.redis).await?),
            }
        };

        tracing::info!(backend = backend.backend_name(), "Cache store initialized");
        Ok(Self { backend })
    }

    /// Wrap an already constructed store.
    pub fn from_store(backend: Arc<dyn CacheStore>) -> Self {
        Self { backend }
    }

    pub fn memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    pub fn disabled() -> Self {
        Self::from_store(Arc::new(NoOpStore))
    }

    pub fn backend(&self) -> &Arc<dyn CacheStore> {
        &self.backend
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    // ========================================================================
    // CacheStore proxy methods
    // ========================================================================

    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        self.backend.get(key).await
    }

    pub async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        self.backend.set(key, value).await
    }

    pub async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.backend.delete(key).await
    }

    pub async fn delete_pattern(&self, pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        self.backend.delete_pattern(pattern).await
    }

    pub async fn clear(&self) -> Result<(), CacheError> {
        self.backend.clear().await
    }

    pub async fn ping(&self) -> Result<(), CacheError> {
        self.backend.ping().await
    }
}

impl std::fmt::Debug for CacheManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CacheManager")
            .field("backend", &self.backend.backend_name())
            .finish()
    }
}
