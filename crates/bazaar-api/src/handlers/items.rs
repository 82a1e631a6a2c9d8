//! Item endpoints
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use bazaar_core::model::{Item, Tag};

use crate::auth::models::MessageResponse;
use crate::auth::AuthenticatedUser;
use crate::db::{ItemRepository, RepositoryError};
use crate::error::{ApiError, AppError};
use crate::state::AppState;

/// Item creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ItemCreate {
    #[validate(length(min = 1, max = 80, message = "Item name must be 1-80 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
    /// Owning store id
    pub store_id: i64,
}

/// Item update request; the owning store cannot be changed
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ItemUpdate {
    #[validate(length(min = 1, max = 80, message = "Item name must be 1-80 characters"))]
    pub name: String,
    #[validate(range(min = 0.0, message = "Price must not be negative"))]
    pub price: f64,
}

/// Item with its attached tags
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ItemWithTags {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub store_id: i64,
    pub tags: Vec<Tag>,
}

impl ItemWithTags {
    fn new(item: Item, tags: Vec<Tag>) -> Self {
        Self {
            id: item.id,
            name: item.name,
            price: item.price,
            store_id: item.store_id,
            tags,
        }
    }
}

fn item_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Item".to_string()),
        other => other.into(),
    }
}

/// List all items
#[utoipa::path(
    get,
    path = "/api/v1/item",
    responses(
        (status = 200, description = "All items", body = Vec<Item>)
    ),
    tag = "items"
)]
pub async fn list_items(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Item>>, AppError> {
    let items = ItemRepository::new(&state.pool).list().await?;
    Ok(Json(items))
}

/// Fetch an item by id, including its tags
#[utoipa::path(
    get,
    path = "/api/v1/item/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item found", body = ItemWithTags),
        (status = 404, description = "Item not found", body = ApiError)
    ),
    tag = "items"
)]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ItemWithTags>, AppError> {
    let repo = ItemRepository::new(&state.pool);
    let item = repo.get(id).await.map_err(item_not_found)?;
    let tags = repo.tags_for_item(id).await?;

    Ok(Json(ItemWithTags::new(item, tags)))
}

/// Create an item in a store
#[utoipa::path(
    post,
    path = "/api/v1/item",
    request_body = ItemCreate,
    responses(
        (status = 201, description = "Item created", body = Item),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Store does not exist", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ItemCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let item = ItemRepository::new(&state.pool)
        .create(&payload.name, payload.price, payload.store_id)
        .await?;

    tracing::info!(item_id = item.id, store_id = item.store_id, "item created");
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update an item's name and price
#[utoipa::path(
    put,
    path = "/api/v1/item/{id}",
    params(("id" = i64, Path, description = "Item id")),
    request_body = ItemUpdate,
    responses(
        (status = 200, description = "Item updated", body = Item),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 404, description = "Item not found", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(payload): Json<ItemUpdate>,
) -> Result<Json<Item>, AppError> {
    payload.validate()?;

    let item = ItemRepository::new(&state.pool)
        .update(id, &payload.name, payload.price)
        .await
        .map_err(item_not_found)?;

    Ok(Json(item))
}

/// Delete an item (admin only, fresh token required)
#[utoipa::path(
    delete,
    path = "/api/v1/item/{id}",
    params(("id" = i64, Path, description = "Item id")),
    responses(
        (status = 200, description = "Item deleted", body = MessageResponse),
        (status = 401, description = "Token not fresh", body = ApiError),
        (status = 403, description = "Admin privilege required", body = ApiError),
        (status = 404, description = "Item not found", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "items"
)]
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    user.require_fresh()?;
    user.require_admin()?;

    ItemRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(item_not_found)?;

    tracing::info!(item_id = id, "item deleted");
    Ok(Json(MessageResponse::new("Item deleted.")))
}
