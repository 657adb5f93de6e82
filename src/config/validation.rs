//! Configuration validation logic
//!
//! Each section validates its own ranges and formats; `Settings::validate`
//! returns the first error encountered.

use crate::config::error::ConfigError;
use crate::config::settings::{
    AuthzConfig, CacheBackend, CacheConfig, DatabaseConfig, FileSettings, JwtConfig,
    LoggerSettings, ServerConfig, Settings,
};

/// Valid log levels
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Valid log formats
const VALID_LOG_FORMATS: &[&str] = &["full", "compact", "json"];

impl ServerConfig {
    /// Validate server configuration
    ///
    /// # Validation Rules
    /// - Port must be between 1 and 65535
    /// - Request timeout must be greater than 0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::validation(
                "server.request_timeout",
                "Request timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl DatabaseConfig {
    /// Validate database configuration
    ///
    /// # Validation Rules
    /// - URL must be a non-empty PostgreSQL connection string
    /// - Min and max connections must be greater than 0, min <= max
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !["postgres://", "postgresql://"]
            .iter()
            .any(|scheme| self.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections == 0 {
            return Err(ConfigError::validation(
                "database.min_connections",
                "Min connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::ValidationError {
                field: "database.min_connections".to_string(),
                message: format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            });
        }

        Ok(())
    }
}

impl JwtConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret cannot be empty",
            ));
        }

        if self.secret.len() < 32 {
            return Err(ConfigError::validation(
                "jwt.secret",
                "JWT secret should be at least 32 characters for security",
            ));
        }

        if self.access_token_expiration <= 0 {
            return Err(ConfigError::validation(
                "jwt.access_token_expiration",
                "Access token expiration must be positive",
            ));
        }

        Ok(())
    }
}

impl FileSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.enabled && self.path.trim().is_empty() {
            return Err(ConfigError::validation(
                "logger.file.path",
                "File path is required when file logging is enabled.",
            ));
        }

        if !VALID_LOG_FORMATS.contains(&self.format.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.file.format".to_string(),
                message: format!(
                    "Invalid log format '{}'. Valid formats are: {}",
                    self.format,
                    VALID_LOG_FORMATS.join(", ")
                ),
            });
        }

        Ok(())
    }
}

impl LoggerSettings {
    /// Validate logger settings
    ///
    /// The default level (before any `target=level` directives) must be one of
    /// trace, debug, info, warn, error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let default_level = self.level.split(',').next().unwrap_or_default().trim();
        if !VALID_LOG_LEVELS.contains(&default_level.to_lowercase().as_str()) {
            return Err(ConfigError::ValidationError {
                field: "logger.level".to_string(),
                message: format!(
                    "Invalid log level '{}'. Valid levels are: {}",
                    self.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        if !self.console.enabled && !self.file.enabled {
            return Err(ConfigError::validation(
                "logger",
                "At least one output (console or file) must be enabled.",
            ));
        }

        self.file.validate()
    }
}

impl CacheConfig {
    /// Backend settings are only checked for the selected backend.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.backend == CacheBackend::Memory {
            if self.max_entries == 0 {
                return Err(ConfigError::validation(
                    "cache.max_entries",
                    "Memory cache must hold at least one entry.",
                ));
            }
            return Ok(());
        }

        if !["redis://", "rediss://"]
            .iter()
            .any(|scheme| self.redis.url.starts_with(scheme))
        {
            return Err(ConfigError::validation(
                "cache.redis.url",
                "Invalid Redis URL. Expected redis://host[:port] or rediss://host[:port].",
            ));
        }

        if self.redis.pool_size == 0 {
            return Err(ConfigError::validation(
                "cache.redis.pool_size",
                "Pool size must be greater than 0.",
            ));
        }

        if self.redis.key_prefix.trim().is_empty() {
            return Err(ConfigError::validation(
                "cache.redis.key_prefix",
                "Key prefix cannot be empty.",
            ));
        }

        Ok(())
    }
}

impl AuthzConfig {
    /// Permission strings must be non-empty and contain no whitespace.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (role, permissions) in &self.roles {
            if role.trim().is_empty() {
                return Err(ConfigError::validation(
                    "authz.roles",
                    "Role names cannot be empty.",
                ));
            }

            if let Some(bad) = permissions
                .iter()
                .find(|p| p.is_empty() || p.chars().any(char::is_whitespace))
            {
                return Err(ConfigError::ValidationError {
                    field: format!("authz.roles.{}", role),
                    message: format!("Invalid permission string '{}'.", bad),
                });
            }
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.jwt.validate()?;
        self.logger.validate()?;
        self.cache.validate()?;
        self.authz.validate()?;
        Ok(())
    }
}
