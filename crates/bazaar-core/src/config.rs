//! Bazaar Configuration Management
//!
//! Handles configuration from environment variables and config files
//! with sensible defaults for development. The JWT signing secret has
//! no default and must always be provided explicitly.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Server configuration
    pub server: ServerConfig,

    /// Database connection
    pub database: DatabaseConfig,

    /// Authentication / token configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Fails if `JWT_SECRET` is absent: the signing secret must never be
    /// a hardcoded literal.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Server
        if let Ok(host) = std::env::var("API_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("API_PORT") {
            config.server.port = port.parse().map_err(|_| ConfigError::InvalidValue {
                key: "API_PORT".to_string(),
                value: port,
            })?;
        }

        // Database
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database.url = url;
        }

        // Auth
        config.auth.jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::MissingRequired("JWT_SECRET".to_string()))?;
        if let Ok(secs) = std::env::var("JWT_ACCESS_EXPIRATION_SECS") {
            config.auth.access_expiration_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JWT_ACCESS_EXPIRATION_SECS".to_string(),
                    value: secs,
                })?;
        }
        if let Ok(secs) = std::env::var("JWT_REFRESH_EXPIRATION_SECS") {
            config.auth.refresh_expiration_secs =
                secs.parse().map_err(|_| ConfigError::InvalidValue {
                    key: "JWT_REFRESH_EXPIRATION_SECS".to_string(),
                    value: secs,
                })?;
        }
        if let Ok(issuer) = std::env::var("JWT_ISSUER") {
            config.auth.issuer = issuer;
        }

        // CORS origins from environment variable (comma-separated)
        if let Ok(origins) = std::env::var("CORS_ORIGINS") {
            config.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Logging
        if let Ok(level) = std::env::var("LOG_LEVEL") {
            config.logging.level = level;
        }

        Ok(config)
    }

    /// Load from a TOML file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::FileReadError {
            path: path.clone(),
            source: e,
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path,
            message: e.to_string(),
        })?;

        if config.auth.jwt_secret.is_empty() {
            return Err(ConfigError::MissingRequired("auth.jwt_secret".to_string()));
        }

        Ok(config)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed origins for CORS
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            // Empty by default for security - set via CORS_ORIGINS env var
            cors_origins: vec![],
        }
    }
}

/// Database connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite connection URL
    pub url: String,

    /// Connection pool size
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://bazaar.db".to_string(),
            pool_size: 10,
        }
    }
}

/// Authentication configuration
///
/// `jwt_secret` intentionally defaults to empty: `from_env` and `from_file`
/// reject a missing secret, and there is no development fallback literal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for HMAC signing (must be at least 256 bits)
    pub jwt_secret: String,

    /// Access token expiration time in seconds (default: 3600 = 1 hour)
    pub access_expiration_secs: u64,

    /// Refresh token expiration time in seconds (default: 30 days)
    pub refresh_expiration_secs: u64,

    /// Token issuer identifier
    pub issuer: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            access_expiration_secs: 3600,
            refresh_expiration_secs: 30 * 24 * 3600,
            issuer: "bazaar-api".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// JSON format for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
