//! Response cache with read-through lookups and prefix invalidation.
//!
//! Reads derive a [`CacheKey`] from the resource name and query parameters
//! and go through [`ReadThrough`]. Writes call [`Invalidator`] after commit,
//! which purges the record key and every key under the resource prefix.
//!
//! # Configuration
//!
//! ```toml
//! [cache]
//! enabled = true
//! backend = "memory"  # or "redis"
//!
//! [cache.redis]
//! url = "redis://127.0.0.1:6379"
//! pool_size = 4
//! connection_timeout = 5
//! key_prefix = "emporium"
//! ```

mod error;
mod invalidation;
mod keys;
mod manager;
pub mod memory;
mod noop;
mod read_through;
mod redis;
mod traits;

pub use error::CacheError;
pub use invalidation::{Invalidator, WriteOp};
pub use keys::{CacheKey, InvalidationPattern, build_key};
pub use manager::CacheManager;
pub use noop::NoOpStore;
pub use read_through::{Cached, ReadThrough};
pub use traits::CacheStore;

pub use crate::config::settings::{CacheBackend, CacheConfig, RedisCacheConfig};
