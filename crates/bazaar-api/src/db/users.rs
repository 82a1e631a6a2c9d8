//! User repository
//!
//! Author: hephaex@gmail.com

use super::RepositoryError;
use bazaar_core::model::User;
use sqlx::SqlitePool;

/// Repository for user database operations
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    pub async fn create(&self, username: &str, password_hash: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (username, password_hash) VALUES (?, ?) \
             RETURNING id, username, password_hash",
        )
        .bind(username)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_constraint(e, "username already exists", "invalid user reference")
        })
    }

    /// Find a user by username, returning `None` when absent
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn get(&self, id: i64) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>("SELECT id, username, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Delete a user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such user exists.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[tokio::test]
    async fn test_create_and_get_user() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let user = repo.create("alice", "hash").await.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.username, "alice");

        let fetched = repo.get(user.id).await.unwrap();
        assert_eq!(fetched.username, "alice");

        let by_name = repo.find_by_username("alice").await.unwrap();
        assert!(by_name.is_some());
        assert!(repo.find_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        repo.create("alice", "hash1").await.unwrap();
        let err = repo.create("alice", "hash2").await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let pool = test_pool().await;
        let repo = UserRepository::new(&pool);

        let err = repo.delete(42).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
