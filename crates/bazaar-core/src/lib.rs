//! Bazaar Core - Domain models and shared types
//!
//! This crate defines the core abstractions used throughout the Bazaar system:
//! - Store, item, tag, and user models
//! - Common error types
//! - Configuration management

pub mod config;
pub mod model;

pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use model::{Item, Store, Tag, User};

use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Bazaar operations
#[derive(Error, Debug)]
pub enum BazaarError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, BazaarError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BazaarError::NotFound("store 42".to_string());
        assert_eq!(err.to_string(), "Not found: store 42");

        let err = BazaarError::Conflict("store name taken".to_string());
        assert_eq!(err.to_string(), "Conflict: store name taken");
    }
}
