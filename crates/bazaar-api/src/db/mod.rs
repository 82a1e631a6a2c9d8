//! Database layer: pool construction, schema initialization, repositories
//!
//! SQLite via sqlx with foreign keys enforced on every connection. The
//! schema is created idempotently at startup; there is no separate
//! migrations tooling.
//!
//! Author: hephaex@gmail.com

pub mod items;
pub mod stores;
pub mod tags;
pub mod users;

pub use items::ItemRepository;
pub use stores::StoreRepository;
pub use tags::TagRepository;
pub use users::UserRepository;

use bazaar_core::config::DatabaseConfig;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use thiserror::Error;

/// Repository errors
///
/// Constraint violations are distinguished from generic database failures
/// so the HTTP boundary can translate them to 409 responses.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Foreign key violation: {0}")]
    ForeignKey(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepositoryError {
    /// Classify an insert/delete error against the schema's constraints.
    ///
    /// `conflict_msg` describes the uniqueness violation, `fk_msg` the
    /// referential one; anything else passes through as a database error.
    fn from_constraint(e: sqlx::Error, conflict_msg: &str, fk_msg: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict_msg.to_string());
            }
            if db_err.is_foreign_key_violation() {
                return Self::ForeignKey(fk_msg.to_string());
            }
        }
        Self::Database(e)
    }
}

/// Create a SQLite connection pool.
///
/// Foreign key enforcement is enabled per connection; the database file is
/// created when missing.
pub async fn create_pool(config: &DatabaseConfig) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(&config.url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(config.pool_size)
        .connect_with(options)
        .await
}

/// Create all tables if they don't already exist.
///
/// Idempotent; safe to run on every startup. Foreign keys deliberately
/// carry no `ON DELETE CASCADE`: deleting a store that still owns items or
/// tags, or a tag that is still attached to items, is rejected.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            username      TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS stores (
            id   INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL,
            price    REAL NOT NULL,
            store_id INTEGER NOT NULL REFERENCES stores(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL,
            store_id INTEGER NOT NULL REFERENCES stores(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS items_tags (
            item_id INTEGER NOT NULL REFERENCES items(id),
            tag_id  INTEGER NOT NULL REFERENCES tags(id),
            PRIMARY KEY (item_id, tag_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
pub(crate) async fn test_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        // A single connection: every in-memory SQLite connection is its
        // own database.
        pool_size: 1,
    };
    let pool = create_pool(&config).await.expect("pool");
    init_schema(&pool).await.expect("schema");
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let pool = test_pool().await;
        init_schema(&pool).await.expect("second run");
        init_schema(&pool).await.expect("third run");
    }

    #[tokio::test]
    async fn test_foreign_keys_enforced() {
        let pool = test_pool().await;

        let result = sqlx::query("INSERT INTO items (name, price, store_id) VALUES (?, ?, ?)")
            .bind("orphan")
            .bind(1.0)
            .bind(999_i64)
            .execute(&pool)
            .await;

        let err = result.expect_err("orphan insert must fail");
        match err {
            sqlx::Error::Database(db_err) => assert!(db_err.is_foreign_key_violation()),
            other => panic!("unexpected error: {other}"),
        }
    }
}
