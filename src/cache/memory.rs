//! In-process cache backed by an ordered map.
//!
//! Keys sharing a prefix are contiguous in a `BTreeMap`, so a pattern purge is
//! a single range scan instead of a walk over the whole keyspace.
//!
//! The map holds at most `capacity` entries. Inserting a new key into a full
//! store evicts the lowest key first; overwriting an existing key never evicts.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::cache::{CacheError, CacheStore, InvalidationPattern};

/// Entry cap used when none is configured.
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    capacity: usize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `capacity` entries (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, CacheError> {
        self.entries
            .lock()
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the stored keys in order.
    pub fn keys(&self) -> Vec<String> {
        self.lock()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        Ok(self.lock()?.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut entries = self.lock()?;

        if entries.len() >= self.capacity && !entries.contains_key(key) {
            if let Some((evicted, _)) = entries.pop_first() {
                tracing::debug!(
                    key = %evicted,
                    capacity = self.capacity,
                    "Memory cache full, evicted entry"
                );
            }
        }

        entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.lock()?.remove(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        let prefix = pattern.prefix();
        let mut entries = self.lock()?;

        let matched: Vec<String> = entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &matched {
            entries.remove(key);
        }

        Ok(matched.len() as u64)
    }

    async fn clear(&self) -> Result<(), CacheError> {
        self.lock()?.clear();
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded(keys: &[&str]) -> MemoryStore {
        let store = MemoryStore::new();
        for key in keys {
            store.set(key, key.as_bytes().to_vec()).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn test_get_set_overwrite() {
        let store = MemoryStore::new();
        assert_eq!(store.get("products").await.unwrap(), None);

        store.set("products", b"one".to_vec()).await.unwrap();
        store.set("products", b"two".to_vec()).await.unwrap();

        assert_eq!(store.get("products").await.unwrap(), Some(b"two".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_absent_key_is_noop() {
        let store = seeded(&["products"]).await;
        store.delete("users").await.unwrap();
        assert_eq!(store.keys(), vec!["products"]);
    }

    #[tokio::test]
    async fn test_delete_pattern_only_touches_prefix() {
        let store = seeded(&[
            "product",
            "products",
            "products:42",
            "products:{\"page\":2}",
            "productsx",
            "users",
            "users:7",
        ])
        .await;

        let removed = store
            .delete_pattern(&InvalidationPattern::new("products"))
            .await
            .unwrap();

        assert_eq!(removed, 4);
        assert_eq!(store.keys(), vec!["product", "users", "users:7"]);
    }

    #[tokio::test]
    async fn test_delete_pattern_without_matches() {
        let store = seeded(&["users"]).await;
        let removed = store
            .delete_pattern(&InvalidationPattern::new("products"))
            .await
            .unwrap();
        assert_eq!(removed, 0);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_full_store_evicts_lowest_key() {
        let store = MemoryStore::with_capacity(2);
        store.set("products", b"list".to_vec()).await.unwrap();
        store.set("users", b"list".to_vec()).await.unwrap();

        store.set("users", b"again".to_vec()).await.unwrap();
        assert_eq!(store.keys(), vec!["products", "users"]);

        store.set("products:7", b"record".to_vec()).await.unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.keys(), vec!["products:7", "users"]);
        assert_eq!(store.get("products").await.unwrap(), None);
    }

    #[test]
    fn test_zero_capacity_still_holds_one_entry() {
        assert_eq!(MemoryStore::with_capacity(0).capacity(), 1);
        assert_eq!(MemoryStore::new().capacity(), DEFAULT_MAX_ENTRIES);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = seeded(&["products", "users"]).await;
        store.clear().await.unwrap();
        assert!(store.is_empty());
    }
}
