//! Read-through memoization over a [`CacheManager`].

use std::future::Future;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cache::{CacheKey, CacheManager};
use crate::error::AppResult;

/// A value together with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub value: T,
    pub from_cache: bool,
}

impl<T> Cached<T> {
    pub fn hit(value: T) -> Self {
        Self {
            value,
            from_cache: true,
        }
    }

    pub fn miss(value: T) -> Self {
        Self {
            value,
            from_cache: false,
        }
    }

    /// `HIT` or `MISS`, as reported in the `x-cache` header.
    pub fn status(&self) -> &'static str {
        if self.from_cache { "HIT" } else { "MISS" }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Cached<U> {
        Cached {
            value: f(self.value),
            from_cache: self.from_cache,
        }
    }
}

/// Serves a stored value when present, otherwise runs the producer and stores
/// its result.
///
/// Store failures never reach the caller: they are logged and the producer
/// result is returned uncached. A producer error is returned as is and nothing
/// is written.
pub struct ReadThrough<'a> {
    cache: &'a CacheManager,
}

impl<'a> ReadThrough<'a> {
    pub fn new(cache: &'a CacheManager) -> Self {
        Self { cache }
    }

    pub async fn fetch<T, F, Fut>(&self, key: &CacheKey, producer: F) -> AppResult<Cached<T>>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<T>>,
    {
        if let Some(value) = self.lookup(key).await {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(Cached::hit(value));
        }

        tracing::debug!(key = %key, "Cache miss");
        let value = producer().await?;
        self.store(key, &value).await;
        Ok(Cached::miss(value))
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let bytes = match self.cache.get(key.as_str()).await {
            Ok(bytes) => bytes?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, querying source");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Discarding undecodable cache entry");
                None
            }
        }
    }

    async fn store<T: Serialize>(&self, key: &CacheKey, value: &T) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to encode value for cache");
                return;
            }
        };

        if let Err(e) = self.cache.set(key.as_str(), bytes).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
    }
}
