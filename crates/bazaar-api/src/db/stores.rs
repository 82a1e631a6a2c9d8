//! Store repository
//!
//! Author: hephaex@gmail.com

use super::RepositoryError;
use bazaar_core::model::Store;
use sqlx::SqlitePool;

/// Repository for store database operations
pub struct StoreRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> StoreRepository<'a> {
    /// Create a new store repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all stores
    pub async fn list(&self) -> Result<Vec<Store>, RepositoryError> {
        let stores = sqlx::query_as::<_, Store>("SELECT id, name FROM stores ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(stores)
    }

    /// Get a store by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store exists.
    pub async fn get(&self, id: i64) -> Result<Store, RepositoryError> {
        sqlx::query_as::<_, Store>("SELECT id, name FROM stores WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Create a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is taken.
    pub async fn create(&self, name: &str) -> Result<Store, RepositoryError> {
        sqlx::query_as::<_, Store>("INSERT INTO stores (name) VALUES (?) RETURNING id, name")
            .bind(name)
            .fetch_one(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_constraint(
                    e,
                    "a store with that name already exists",
                    "invalid store reference",
                )
            })
    }

    /// Delete a store by id.
    ///
    /// Deleting a store that still owns items or tags is rejected: the
    /// foreign keys carry no cascade, so the violation surfaces as a
    /// conflict and nothing is partially deleted.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such store exists and
    /// `RepositoryError::ForeignKey` if the store is non-empty.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM stores WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_constraint(
                    e,
                    "store is referenced",
                    "store still owns items or tags",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
