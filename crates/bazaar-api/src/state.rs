//! Shared application state
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use sqlx::SqlitePool;

use bazaar_core::config::AppConfig;

use crate::auth::jwt::JwtConfig;
use crate::auth::registry::TokenRegistry;

/// Application state shared across all request handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub pool: SqlitePool,
    /// Token signing and validation parameters
    pub jwt: JwtConfig,
    /// Revocation registry consulted on every authenticated request
    pub registry: Arc<dyn TokenRegistry>,
}

impl AppState {
    pub fn new(config: &AppConfig, pool: SqlitePool, registry: Arc<dyn TokenRegistry>) -> Self {
        Self {
            pool,
            jwt: JwtConfig::from(&config.auth),
            registry,
        }
    }
}
