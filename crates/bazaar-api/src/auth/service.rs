//! Authentication service
//!
//! Registration, credential login, token refresh, and logout. Login issues a
//! fresh access token plus a refresh token; refreshing consumes the refresh
//! token (its jti is revoked) and yields a non-fresh access token, so
//! operations that demand a fresh token force a new login.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use sqlx::SqlitePool;

use bazaar_core::model::User;

use crate::auth::jwt::{
    generate_access_token, generate_refresh_token, validate_token, JwtConfig, TokenUse,
};
use crate::auth::models::TokenPair;
use crate::auth::password::{hash_password, verify_password};
use crate::auth::registry::TokenRegistry;
use crate::db::UserRepository;
use crate::error::AppError;

/// Authentication operations over the user store and token registry
pub struct AuthService<'a> {
    pool: &'a SqlitePool,
    jwt: &'a JwtConfig,
    registry: &'a Arc<dyn TokenRegistry>,
}

impl<'a> AuthService<'a> {
    pub fn new(
        pool: &'a SqlitePool,
        jwt: &'a JwtConfig,
        registry: &'a Arc<dyn TokenRegistry>,
    ) -> Self {
        Self {
            pool,
            jwt,
            registry,
        }
    }

    /// Create a new user with a hashed password.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let password_hash = hash_password(password)?;
        let repo = UserRepository::new(self.pool);
        let user = repo.create(username, &password_hash).await?;

        tracing::info!(user_id = user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue a fresh access token plus a refresh token.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair, AppError> {
        let repo = UserRepository::new(self.pool);
        let user = repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let access_token = generate_access_token(self.jwt, user.id, user.is_admin(), true)?;
        let refresh_token = generate_refresh_token(self.jwt, user.id, user.is_admin())?;

        tracing::info!(user_id = user.id, "user logged in");
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Exchange a refresh token for a non-fresh access token.
    ///
    /// The refresh token is single-use: its jti is revoked here, so replaying
    /// it fails with a revocation error.
    pub fn refresh(&self, refresh_token: &str) -> Result<String, AppError> {
        let claims = validate_token(self.jwt, refresh_token, TokenUse::Refresh)?;

        // Consuming the jti and checking it must be one atomic step: two
        // concurrent exchanges of the same token race otherwise, and both
        // would succeed. Exactly one caller sees the insert.
        if !self.registry.revoke(&claims.jti) {
            return Err(AppError::TokenRevoked);
        }

        let access_token = generate_access_token(self.jwt, claims.sub, claims.is_admin, false)?;

        tracing::debug!(user_id = claims.sub, "access token refreshed");
        Ok(access_token)
    }

    /// Revoke the presented access token's jti.
    pub fn logout(&self, jti: &str) {
        self.registry.revoke(jti);
        tracing::debug!("access token revoked");
    }

    pub async fn get_user(&self, id: i64) -> Result<User, AppError> {
        let repo = UserRepository::new(self.pool);
        repo.get(id).await.map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("User".to_string()),
            other => other.into(),
        })
    }

    pub async fn delete_user(&self, id: i64) -> Result<(), AppError> {
        let repo = UserRepository::new(self.pool);
        repo.delete(id).await.map_err(|e| match e {
            crate::db::RepositoryError::NotFound => AppError::NotFound("User".to_string()),
            other => other.into(),
        })?;

        tracing::info!(user_id = id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::registry::InMemoryTokenRegistry;
    use crate::db::test_pool;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret".to_string(),
            access_expiration_secs: 3600,
            refresh_expiration_secs: 86400,
            issuer: "bazaar-api".to_string(),
        }
    }

    fn registry() -> Arc<dyn TokenRegistry> {
        Arc::new(InMemoryTokenRegistry::new())
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        let user = service.register("alice", "hunter2").await.unwrap();
        assert_eq!(user.username, "alice");
        assert!(user.is_admin());

        let tokens = service.login("alice", "hunter2").await.unwrap();
        let claims = validate_token(&jwt, &tokens.access_token, TokenUse::Access).unwrap();
        assert_eq!(claims.sub, user.id);
        assert!(claims.fresh);
        assert!(claims.is_admin);
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("bob", "correct").await.unwrap();

        assert!(matches!(
            service.login("bob", "wrong").await,
            Err(AppError::Unauthorized)
        ));
        assert!(matches!(
            service.login("nobody", "whatever").await,
            Err(AppError::Unauthorized)
        ));
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("carol", "pw").await.unwrap();
        assert!(matches!(
            service.register("carol", "pw2").await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_refresh_is_single_use() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("dave", "pw").await.unwrap();
        let tokens = service.login("dave", "pw").await.unwrap();

        let access = service.refresh(&tokens.refresh_token).unwrap();
        let claims = validate_token(&jwt, &access, TokenUse::Access).unwrap();
        assert!(!claims.fresh);

        assert!(matches!(
            service.refresh(&tokens.refresh_token),
            Err(AppError::TokenRevoked)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_refresh_has_single_winner() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("grace", "pw").await.unwrap();
        let tokens = service.login("grace", "pw").await.unwrap();

        // Same refresh token exchanged from several threads at once:
        // exactly one exchange may succeed.
        let successes = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| scope.spawn(|| service.refresh(&tokens.refresh_token).is_ok()))
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap())
                .filter(|ok| *ok)
                .count()
        });

        assert_eq!(successes, 1);
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("erin", "pw").await.unwrap();
        let tokens = service.login("erin", "pw").await.unwrap();

        assert!(service.refresh(&tokens.access_token).is_err());
    }

    #[tokio::test]
    async fn test_logout_revokes_jti() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("frank", "pw").await.unwrap();
        let tokens = service.login("frank", "pw").await.unwrap();
        let claims = validate_token(&jwt, &tokens.access_token, TokenUse::Access).unwrap();

        service.logout(&claims.jti);
        assert!(registry.is_revoked(&claims.jti));
    }

    #[tokio::test]
    async fn test_second_user_is_not_admin() {
        let pool = test_pool().await;
        let jwt = jwt_config();
        let registry = registry();
        let service = AuthService::new(&pool, &jwt, &registry);

        service.register("first", "pw").await.unwrap();
        service.register("second", "pw").await.unwrap();

        let tokens = service.login("second", "pw").await.unwrap();
        let claims = validate_token(&jwt, &tokens.access_token, TokenUse::Access).unwrap();
        assert!(!claims.is_admin);
    }
}
