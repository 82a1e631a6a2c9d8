//! Authentication middleware
//!
//! Extracts the Bearer token, validates it as an access token, rejects
//! revoked tokens, and stores the caller's identity as a request extension
//! for downstream handlers.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::jwt::{validate_token, TokenUse};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller identity, inserted as a request extension
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i64,
    pub is_admin: bool,
    pub fresh: bool,
    pub jti: String,
}

impl AuthenticatedUser {
    /// Reject tokens minted by a refresh rather than a direct login.
    pub fn require_fresh(&self) -> Result<(), AppError> {
        if self.fresh {
            Ok(())
        } else {
            Err(AppError::TokenNotFresh)
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(AppError::Forbidden("Admin privilege required".to_string()))
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
fn extract_bearer_token(request: &Request) -> Result<&str, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or(AppError::AuthorizationRequired)?;

    header
        .strip_prefix("Bearer ")
        .ok_or(AppError::AuthorizationRequired)
}

/// Middleware guarding the protected route group.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = extract_bearer_token(&request)?;
    let claims = validate_token(&state.jwt, token, TokenUse::Access)?;

    if state.registry.is_revoked(&claims.jti) {
        return Err(AppError::TokenRevoked);
    }

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.sub,
        is_admin: claims.is_admin,
        fresh: claims.fresh,
        jti: claims.jti,
    });

    Ok(next.run(request).await)
}
