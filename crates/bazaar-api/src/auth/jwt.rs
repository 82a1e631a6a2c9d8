//! JWT token generation and validation
//!
//! Implements JWT-based authentication with HMAC-SHA256 signing. Access
//! tokens are short-lived and carry a freshness flag; refresh tokens are
//! longer-lived and may only be exchanged for a non-fresh access token.

use bazaar_core::config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

/// Distinguishes access tokens from refresh tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenUse {
    Access,
    Refresh,
}

/// JWT Claims structure
///
/// These claims are embedded in every token and extracted during validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Token issuer
    pub iss: String,
    /// Subject - user ID
    pub sub: i64,
    /// JWT ID - unique token identifier, the revocation key
    pub jti: String,
    /// Issued at timestamp (Unix epoch)
    pub iat: u64,
    /// Expiration timestamp (Unix epoch)
    pub exp: u64,
    /// True only for access tokens issued directly from a password login
    pub fresh: bool,
    /// Admin claim (policy stub: first registered user only)
    pub is_admin: bool,
    /// Whether this is an access or a refresh token
    pub token_use: TokenUse,
}

/// JWT token generation and validation errors
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode JWT: {0}")]
    EncodingError(#[from] jsonwebtoken::errors::Error),

    #[error("Invalid token format")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Invalid token signature")]
    InvalidSignature,

    #[error("Wrong token type for this operation")]
    WrongTokenUse,

    #[error("System time error: {0}")]
    SystemTimeError(#[from] std::time::SystemTimeError),
}

/// JWT Configuration
///
/// Derived from [`AuthConfig`]; the secret always comes from configuration,
/// never from a literal.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Secret key for HMAC signing (must be at least 256 bits)
    pub secret: String,
    /// Access token expiration time in seconds
    pub access_expiration_secs: u64,
    /// Refresh token expiration time in seconds
    pub refresh_expiration_secs: u64,
    /// Token issuer identifier
    pub issuer: String,
}

impl From<&AuthConfig> for JwtConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            access_expiration_secs: auth.access_expiration_secs,
            refresh_expiration_secs: auth.refresh_expiration_secs,
            issuer: auth.issuer.clone(),
        }
    }
}

/// Generate a JWT access token for an authenticated user
///
/// # Arguments
///
/// * `config` - JWT configuration containing secret and expiration settings
/// * `user_id` - Unique user identifier
/// * `is_admin` - Admin claim value for this user
/// * `fresh` - True when the token is issued directly from a password login
pub fn generate_access_token(
    config: &JwtConfig,
    user_id: i64,
    is_admin: bool,
    fresh: bool,
) -> Result<String, JwtError> {
    generate_token(
        config,
        user_id,
        is_admin,
        fresh,
        TokenUse::Access,
        config.access_expiration_secs,
    )
}

/// Generate a JWT refresh token for an authenticated user
///
/// Refresh tokens are never fresh; they only exist to mint new non-fresh
/// access tokens without re-entering a password.
pub fn generate_refresh_token(
    config: &JwtConfig,
    user_id: i64,
    is_admin: bool,
) -> Result<String, JwtError> {
    generate_token(
        config,
        user_id,
        is_admin,
        false,
        TokenUse::Refresh,
        config.refresh_expiration_secs,
    )
}

fn generate_token(
    config: &JwtConfig,
    user_id: i64,
    is_admin: bool,
    fresh: bool,
    token_use: TokenUse,
    expiration_secs: u64,
) -> Result<String, JwtError> {
    let now = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();

    let claims = Claims {
        iss: config.issuer.clone(),
        sub: user_id,
        jti: Uuid::new_v4().to_string(),
        iat: now,
        exp: now + expiration_secs,
        fresh,
        is_admin,
        token_use,
    };

    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )?;

    Ok(token)
}

/// Validate a JWT and extract claims
///
/// # Arguments
///
/// * `config` - JWT configuration containing secret for validation
/// * `token` - The JWT token string to validate
/// * `expected_use` - Whether an access or a refresh token is expected here
///
/// # Returns
///
/// * `Ok(Claims)` - Decoded and validated claims
/// * `Err(JwtError)` - If validation fails (expired, invalid signature,
///   wrong token type, etc.)
pub fn validate_token(
    config: &JwtConfig,
    token: &str,
    expected_use: TokenUse,
) -> Result<Claims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&config.issuer]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
        _ => JwtError::InvalidToken,
    })?;

    if token_data.claims.token_use != expected_use {
        return Err(JwtError::WrongTokenUse);
    }

    Ok(token_data.claims)
}
