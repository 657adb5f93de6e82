//! Configuration management
//!
//! Layered TOML files plus `EMPORIUM_*` environment variable overrides,
//! deserialized into [`Settings`] and validated per section.

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use loader::ConfigLoader;
pub use settings::{AuthzConfig, CacheConfig, DatabaseConfig, JwtConfig, Settings};
