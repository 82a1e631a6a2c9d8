//! Store endpoints
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use bazaar_core::model::Store;

use crate::auth::models::MessageResponse;
use crate::auth::AuthenticatedUser;
use crate::db::{RepositoryError, StoreRepository};
use crate::error::{ApiError, AppError};
use crate::state::AppState;

/// Store creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct StoreCreate {
    /// Store name, unique across all stores
    #[validate(length(min = 1, max = 80, message = "Store name must be 1-80 characters"))]
    pub name: String,
}

fn store_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Store".to_string()),
        other => other.into(),
    }
}

/// List all stores
#[utoipa::path(
    get,
    path = "/api/v1/store",
    responses(
        (status = 200, description = "All stores", body = Vec<Store>)
    ),
    tag = "stores"
)]
pub async fn list_stores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Store>>, AppError> {
    let stores = StoreRepository::new(&state.pool).list().await?;
    Ok(Json(stores))
}

/// Fetch a store by id
#[utoipa::path(
    get,
    path = "/api/v1/store/{id}",
    params(("id" = i64, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store found", body = Store),
        (status = 404, description = "Store not found", body = ApiError)
    ),
    tag = "stores"
)]
pub async fn get_store(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Store>, AppError> {
    let store = StoreRepository::new(&state.pool)
        .get(id)
        .await
        .map_err(store_not_found)?;
    Ok(Json(store))
}

/// Create a store
#[utoipa::path(
    post,
    path = "/api/v1/store",
    request_body = StoreCreate,
    responses(
        (status = 201, description = "Store created", body = Store),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Store name already taken", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "stores"
)]
pub async fn create_store(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StoreCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let store = StoreRepository::new(&state.pool)
        .create(&payload.name)
        .await?;

    tracing::info!(store_id = store.id, "store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// Delete a store (fresh token required; rejected while it owns items or tags)
#[utoipa::path(
    delete,
    path = "/api/v1/store/{id}",
    params(("id" = i64, Path, description = "Store id")),
    responses(
        (status = 200, description = "Store deleted", body = MessageResponse),
        (status = 401, description = "Token not fresh", body = ApiError),
        (status = 404, description = "Store not found", body = ApiError),
        (status = 409, description = "Store still owns items or tags", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "stores"
)]
pub async fn delete_store(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    user.require_fresh()?;

    StoreRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(store_not_found)?;

    tracing::info!(store_id = id, "store deleted");
    Ok(Json(MessageResponse::new("Store deleted")))
}
