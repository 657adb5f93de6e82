//! Write-side cache invalidation.
//!
//! Every committed write on a resource purges the resource pattern, and the
//! record key as well when the write targets one record. Purge failures are
//! logged and swallowed so they never undo a committed write.

use std::fmt;

use crate::cache::{CacheKey, CacheManager, InvalidationPattern};

/// The kinds of write that trigger invalidation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOp {
    Create,
    Update,
    Archive,
    Restore,
    Delete,
    ClearCache,
}

impl WriteOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteOp::Create => "create",
            WriteOp::Update => "update",
            WriteOp::Archive => "archive",
            WriteOp::Restore => "restore",
            WriteOp::Delete => "delete",
            WriteOp::ClearCache => "clear_cache",
        }
    }
}

impl fmt::Display for WriteOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct Invalidator<'a> {
    cache: &'a CacheManager,
}

impl<'a> Invalidator<'a> {
    pub fn new(cache: &'a CacheManager) -> Self {
        Self { cache }
    }

    /// `invalidate(resource, id?)`: with an id, purge `resource:id` and
    /// `resource*`; without, purge `resource*` only.
    pub async fn invalidate(&self, resource: &str, id: Option<&str>) {
        if let Some(id) = id {
            let key = CacheKey::record(resource, id);
            if let Err(e) = self.cache.delete(key.as_str()).await {
                tracing::warn!(key = %key, error = %e, "Failed to purge cache key");
            }
        }

        let pattern = InvalidationPattern::new(resource);
        match self.cache.delete_pattern(&pattern).await {
            Ok(removed) => {
                tracing::debug!(pattern = %pattern, removed, "Purged cache pattern");
            }
            Err(e) => {
                tracing::warn!(pattern = %pattern, error = %e, "Failed to purge cache pattern");
            }
        }
    }

    /// Invalidate after a committed write on one record.
    pub async fn after_write(&self, op: WriteOp, resource: &str, id: impl fmt::Display) {
        let id = id.to_string();
        tracing::info!(op = %op, resource, id = %id, "Invalidating cache after write");
        self.invalidate(resource, Some(&id)).await;
    }

    /// Invalidate after a write that is not tied to one record.
    pub async fn after_bulk_write(&self, op: WriteOp, resource: &str) {
        tracing::info!(op = %op, resource, "Invalidating cache after write");
        self.invalidate(resource, None).await;
    }
}
