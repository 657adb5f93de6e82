//! CacheStore trait definition.

use async_trait::async_trait;

use crate::cache::{CacheError, InvalidationPattern};

/// Key/value store behind the read-through cache.
///
/// Entries live until purged. Operations on the same key are serialized by the
/// backend; operations on disjoint keys never interfere.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Get a value. A miss is `Ok(None)`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value, overwriting any previous one.
    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError>;

    /// Remove one entry. Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    /// Remove every entry whose key starts with the pattern's prefix and
    /// return how many were removed.
    async fn delete_pattern(&self, pattern: &InvalidationPattern) -> Result<u64, CacheError>;

    /// Remove every entry owned by this store.
    async fn clear(&self) -> Result<(), CacheError>;

    /// Short backend name used in logs and health output.
    fn backend_name(&self) -> &'static str;

    /// Check that the backend is reachable.
    async fn ping(&self) -> Result<(), CacheError> {
        Ok(())
    }
}
