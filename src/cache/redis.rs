//! Redis cache implementation using bb8 connection pool.

use std::time::Duration;

use async_trait::async_trait;
use bb8::{Pool, PooledConnection};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client, RedisError};

use crate::cache::{CacheError, CacheStore, InvalidationPattern};
use crate::config::settings::RedisCacheConfig;

type RedisPool = Pool<Client>;

const SCAN_BATCH: usize = 200;

/// Redis-backed store. Every key is namespaced under `{key_prefix}:`.
pub struct RedisStore {
    pool: RedisPool,
    key_prefix: String,
}

impl RedisStore {
    pub async fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let client =
            Client::open(config.url.as_str()).map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size)
            .connection_timeout(Duration::from_secs(config.connection_timeout))
            .build(client)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        Ok(Self {
            pool,
            key_prefix: config.key_prefix.clone(),
        })
    }

    fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }

    async fn get_conn(&self) -> Result<PooledConnection<'_, Client>, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }

    /// Collect every key matching a glob with incremental SCAN.
    async fn scan_keys(
        conn: &mut MultiplexedConnection,
        glob: &str,
    ) -> Result<Vec<String>, CacheError> {
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(glob)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut *conn)
                .await
                .map_err(|e: RedisError| CacheError::Operation(e.to_string()))?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        Ok(keys)
    }

    async fn delete_matching(&self, glob: &str) -> Result<u64, CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;

        let keys = Self::scan_keys(conn_ref, glob).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        conn_ref
            .del::<_, u64>(keys)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }
}

/// Escape glob metacharacters so a key prefix matches literally.
fn escape_glob(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[async_trait]
impl CacheStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .get(self.prefixed_key(key))
            .await
            .map_err(|e: RedisError| CacheError::Operation(e.to_string()))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .set::<_, _, ()>(self.prefixed_key(key), value)
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        conn_ref
            .del::<_, ()>(self.prefixed_key(key))
            .await
            .map_err(|e| CacheError::Operation(e.to_string()))
    }

    async fn delete_pattern(&self, pattern: &InvalidationPattern) -> Result<u64, CacheError> {
        let glob = format!("{}*", escape_glob(&self.prefixed_key(pattern.prefix())));
        self.delete_matching(&glob).await
    }

    async fn clear(&self) -> Result<(), CacheError> {
        let glob = format!("{}:*", escape_glob(&self.key_prefix));
        self.delete_matching(&glob).await.map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "redis"
    }

    async fn ping(&self) -> Result<(), CacheError> {
        let mut conn = self.get_conn().await?;
        let conn_ref: &mut MultiplexedConnection = &mut conn;
        redis::cmd("PING")
            .query_async::<String>(conn_ref)
            .await
            .map(|_| ())
            .map_err(|e| CacheError::Operation(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_glob_keeps_plain_keys() {
        assert_eq!(escape_glob("emporium:products"), "emporium:products");
    }

    #[test]
    fn test_escape_glob_escapes_metacharacters() {
        assert_eq!(
            escape_glob(r#"emporium:products:{"title":"a*b[1]"}"#),
            r#"emporium:products:{"title":"a\*b\[1\]"}"#
        );
    }
}
