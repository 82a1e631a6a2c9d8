//! Tag endpoints, including item-tag attach and detach
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use bazaar_core::model::{Item, Tag};

use crate::auth::models::MessageResponse;
use crate::db::{RepositoryError, TagRepository};
use crate::error::{ApiError, AppError};
use crate::state::AppState;

/// Tag creation request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct TagCreate {
    #[validate(length(min = 1, max = 80, message = "Tag name must be 1-80 characters"))]
    pub name: String,
    /// Owning store id
    pub store_id: i64,
}

/// Tag with the items it is attached to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TagWithItems {
    pub id: i64,
    pub name: String,
    pub store_id: i64,
    pub items: Vec<Item>,
}

fn tag_not_found(err: RepositoryError) -> AppError {
    match err {
        RepositoryError::NotFound => AppError::NotFound("Tag".to_string()),
        other => other.into(),
    }
}

/// List all tags
#[utoipa::path(
    get,
    path = "/api/v1/tag",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>)
    ),
    tag = "tags"
)]
pub async fn list_tags(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = TagRepository::new(&state.pool).list().await?;
    Ok(Json(tags))
}

/// Fetch a tag by id, including the items it is attached to
#[utoipa::path(
    get,
    path = "/api/v1/tag/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag found", body = TagWithItems),
        (status = 404, description = "Tag not found", body = ApiError)
    ),
    tag = "tags"
)]
pub async fn get_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TagWithItems>, AppError> {
    let repo = TagRepository::new(&state.pool);
    let tag = repo.get(id).await.map_err(tag_not_found)?;
    let items = repo.items_for_tag(id).await?;

    Ok(Json(TagWithItems {
        id: tag.id,
        name: tag.name,
        store_id: tag.store_id,
        items,
    }))
}

/// Create a tag in a store
#[utoipa::path(
    post,
    path = "/api/v1/tag",
    request_body = TagCreate,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 409, description = "Store does not exist", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "tags"
)]
pub async fn create_tag(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TagCreate>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let tag = TagRepository::new(&state.pool)
        .create(&payload.name, payload.store_id)
        .await?;

    tracing::info!(tag_id = tag.id, store_id = tag.store_id, "tag created");
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Delete a tag (rejected while items remain attached)
#[utoipa::path(
    delete,
    path = "/api/v1/tag/{id}",
    params(("id" = i64, Path, description = "Tag id")),
    responses(
        (status = 200, description = "Tag deleted", body = MessageResponse),
        (status = 404, description = "Tag not found", body = ApiError),
        (status = 409, description = "Tag still attached to items", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "tags"
)]
pub async fn delete_tag(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    TagRepository::new(&state.pool)
        .delete(id)
        .await
        .map_err(tag_not_found)?;

    tracing::info!(tag_id = id, "tag deleted");
    Ok(Json(MessageResponse::new("Tag deleted.")))
}

/// Attach a tag to an item in the same store (idempotent)
#[utoipa::path(
    post,
    path = "/api/v1/item/{item_id}/tag/{tag_id}",
    params(
        ("item_id" = i64, Path, description = "Item id"),
        ("tag_id" = i64, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag attached", body = MessageResponse),
        (status = 404, description = "Item or tag not found", body = ApiError),
        (status = 409, description = "Item and tag belong to different stores", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "tags"
)]
pub async fn attach_tag(
    State(state): State<Arc<AppState>>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    TagRepository::new(&state.pool)
        .attach(item_id, tag_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Item or tag".to_string()),
            other => other.into(),
        })?;

    tracing::debug!(item_id, tag_id, "tag attached");
    Ok(Json(MessageResponse::new("Tag attached to item.")))
}

/// Detach a tag from an item
#[utoipa::path(
    delete,
    path = "/api/v1/item/{item_id}/tag/{tag_id}",
    params(
        ("item_id" = i64, Path, description = "Item id"),
        ("tag_id" = i64, Path, description = "Tag id")
    ),
    responses(
        (status = 200, description = "Tag detached", body = MessageResponse),
        (status = 404, description = "Link not found", body = ApiError)
    ),
    security(("bearer_auth" = [])),
    tag = "tags"
)]
pub async fn detach_tag(
    State(state): State<Arc<AppState>>,
    Path((item_id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<MessageResponse>, AppError> {
    TagRepository::new(&state.pool)
        .detach(item_id, tag_id)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AppError::NotFound("Item-tag link".to_string()),
            other => other.into(),
        })?;

    tracing::debug!(item_id, tag_id, "tag detached");
    Ok(Json(MessageResponse::new("Tag removed from item.")))
}
