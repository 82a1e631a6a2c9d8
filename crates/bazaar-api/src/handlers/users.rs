//! User and authentication endpoints
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use validator::Validate;

use bazaar_core::model::User;

use crate::auth::models::{
    AccessToken, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenPair,
};
use crate::auth::{AuthService, AuthenticatedUser};
use crate::error::{ApiError, AppError};
use crate::state::AppState;

/// Register a new user
#[utoipa::path(
    post,
    path = "/api/v1/users/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Username already taken", body = ApiError)
    ),
    tag = "users"
)]
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    service.register(&payload.username, &payload.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("User created successfully.")),
    ))
}

/// Log in with username and password
#[utoipa::path(
    post,
    path = "/api/v1/users/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = TokenPair),
        (status = 401, description = "Invalid credentials", body = ApiError)
    ),
    tag = "users"
)]
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    payload.validate()?;

    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    let tokens = service.login(&payload.username, &payload.password).await?;

    Ok(Json(tokens))
}

/// Exchange a refresh token for a new access token
#[utoipa::path(
    post,
    path = "/api/v1/users/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = AccessToken),
        (status = 401, description = "Refresh token invalid or already used", body = ApiError)
    ),
    tag = "users"
)]
pub async fn refresh(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AccessToken>, AppError> {
    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    let access_token = service.refresh(&payload.refresh_token)?;

    Ok(Json(AccessToken { access_token }))
}

/// Revoke the presented access token
#[utoipa::path(
    post,
    path = "/api/v1/users/logout",
    responses(
        (status = 200, description = "Token revoked", body = MessageResponse),
        (status = 401, description = "Not authenticated", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MessageResponse>, AppError> {
    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    service.logout(&user.jti);

    Ok(Json(MessageResponse::new("Successfully logged out")))
}

/// Fetch a user by id
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "User not found", body = ApiError)
    ),
    tag = "users"
)]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<User>, AppError> {
    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    let user = service.get_user(id).await?;

    Ok(Json(user))
}

/// Delete a user account (fresh token required)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 401, description = "Token not fresh", body = ApiError),
        (status = 404, description = "User not found", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "users"
)]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    user.require_fresh()?;

    let service = AuthService::new(&state.pool, &state.jwt, &state.registry);
    service.delete_user(id).await?;

    Ok(Json(MessageResponse::new("User deleted.")))
}
