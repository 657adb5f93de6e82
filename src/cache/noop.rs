//! NoOp cache implementation.
//!
//! Used when caching is disabled. Every read misses and every write is dropped.

use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore, InvalidationPattern};

#[derive(Debug, Default)]
pub struct NoOpStore;

#[async_trait]
impl CacheStore for NoOpStore {
    async fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(None)
    }

    async fn set(&self, _key: &str, _value: Vec<u8>) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Ok(())
    }

    async fn delete_pattern(&self, _pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        Ok(0)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}
