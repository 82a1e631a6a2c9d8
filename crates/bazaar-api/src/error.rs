//! API error handling
//!
//! Every failure is translated at the boundary into a structured JSON body
//! with a stable `error` code and a human-readable message; token failures
//! each map to a distinct code so clients can tell expiry, revocation,
//! invalidity, and staleness apart.
//!
//! Author: hephaex@gmail.com

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::jwt::JwtError;
use crate::auth::password::PasswordError;
use crate::db::RepositoryError;

/// API error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    /// Stable error code
    pub error: String,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Conflict(String),
    Validation(String),
    Unauthorized,
    AuthorizationRequired,
    Forbidden(String),
    TokenExpired,
    TokenRevoked,
    TokenInvalid,
    TokenNotFresh,
    Database(String),
    Internal(String),
}

impl AppError {
    /// Stable code and message for the response body
    fn parts(&self) -> (StatusCode, ApiError) {
        match self {
            Self::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiError::new("not_found", format!("{what} not found")),
            ),
            Self::Conflict(msg) => (
                StatusCode::CONFLICT,
                ApiError::new("conflict", msg.clone()),
            ),
            Self::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::new("validation_error", msg.clone()),
            ),
            Self::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("unauthorized", "Invalid credentials"),
            ),
            Self::AuthorizationRequired => (
                StatusCode::UNAUTHORIZED,
                ApiError::new(
                    "authorization_required",
                    "Request does not contain a valid access token",
                ),
            ),
            Self::Forbidden(msg) => (
                StatusCode::FORBIDDEN,
                ApiError::new("forbidden", msg.clone()),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("token_expired", "The token has expired"),
            ),
            Self::TokenRevoked => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("token_revoked", "The token has been revoked"),
            ),
            Self::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("invalid_token", "Signature verification failed"),
            ),
            Self::TokenNotFresh => (
                StatusCode::UNAUTHORIZED,
                ApiError::new("fresh_token_required", "The token is not fresh"),
            ),
            // Details stay in the logs, not in the response body.
            Self::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("database_error", "Database operation failed"),
            ),
            Self::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("internal_error", "Internal server error"),
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = self.parts();

        if status.is_server_error() {
            tracing::error!(code = %error.error, cause = ?self, "request failed");
        }

        (status, Json(error)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => AppError::NotFound("Record".to_string()),
            RepositoryError::Conflict(msg) => AppError::Conflict(msg),
            // Referential violations are surfaced as conflicts too,
            // distinguishable from generic storage failures.
            RepositoryError::ForeignKey(msg) => AppError::Conflict(msg),
            RepositoryError::Database(e) => AppError::Database(e.to_string()),
        }
    }
}

impl From<JwtError> for AppError {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::ExpiredToken => AppError::TokenExpired,
            JwtError::InvalidSignature
            | JwtError::InvalidToken
            | JwtError::WrongTokenUse
            | JwtError::EncodingError(_) => AppError::TokenInvalid,
            JwtError::SystemTimeError(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<PasswordError> for AppError {
    fn from(err: PasswordError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<bazaar_core::BazaarError> for AppError {
    fn from(err: bazaar_core::BazaarError) -> Self {
        use bazaar_core::BazaarError;
        match err {
            BazaarError::NotFound(what) => AppError::NotFound(what),
            BazaarError::Conflict(msg) => AppError::Conflict(msg),
            BazaarError::ValidationError(msg) => AppError::Validation(msg),
            BazaarError::DatabaseError(msg) => AppError::Database(msg),
            BazaarError::ConfigError(msg) => AppError::Internal(msg),
            BazaarError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_and_code(err: AppError) -> (StatusCode, String) {
        let (status, body) = err.parts();
        (status, body.error)
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            status_and_code(AppError::NotFound("Store".to_string())),
            (StatusCode::NOT_FOUND, "not_found".to_string())
        );
        assert_eq!(
            status_and_code(AppError::Conflict("taken".to_string())),
            (StatusCode::CONFLICT, "conflict".to_string())
        );
        assert_eq!(
            status_and_code(AppError::Unauthorized),
            (StatusCode::UNAUTHORIZED, "unauthorized".to_string())
        );
        assert_eq!(
            status_and_code(AppError::TokenNotFresh),
            (StatusCode::UNAUTHORIZED, "fresh_token_required".to_string())
        );
        assert_eq!(
            status_and_code(AppError::TokenRevoked),
            (StatusCode::UNAUTHORIZED, "token_revoked".to_string())
        );
    }

    #[test]
    fn test_token_failures_have_distinct_codes() {
        let codes: Vec<String> = [
            AppError::TokenExpired,
            AppError::TokenRevoked,
            AppError::TokenInvalid,
            AppError::TokenNotFresh,
        ]
        .into_iter()
        .map(|e| status_and_code(e).1)
        .collect();

        let unique: std::collections::HashSet<_> = codes.iter().collect();
        assert_eq!(unique.len(), codes.len());
    }

    #[test]
    fn test_foreign_key_maps_to_conflict() {
        let err: AppError = RepositoryError::ForeignKey("store does not exist".to_string()).into();
        let (status, code) = status_and_code(err);
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(code, "conflict");
    }
}
