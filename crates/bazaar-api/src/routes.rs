//! Route table
//!
//! Reads are public; mutations sit behind the auth middleware. The two
//! groups are merged so a single path can expose a public GET next to a
//! protected DELETE.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::auth_middleware;
use crate::handlers::{items, stores, tags, users};
use crate::state::AppState;

/// All versioned API routes, to be nested under `/api/v1`.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let public = Router::new()
        .route("/users/register", post(users::register))
        .route("/users/login", post(users::login))
        .route("/users/refresh", post(users::refresh))
        .route("/users/:id", get(users::get_user))
        .route("/store", get(stores::list_stores))
        .route("/store/:id", get(stores::get_store))
        .route("/item", get(items::list_items))
        .route("/item/:id", get(items::get_item))
        .route("/tag", get(tags::list_tags))
        .route("/tag/:id", get(tags::get_tag));

    let protected = Router::new()
        .route("/users/logout", post(users::logout))
        .route("/users/:id", delete(users::delete_user))
        .route("/store", post(stores::create_store))
        .route("/store/:id", delete(stores::delete_store))
        .route("/item", post(items::create_item))
        .route(
            "/item/:id",
            put(items::update_item).delete(items::delete_item),
        )
        .route("/tag", post(tags::create_tag))
        .route("/tag/:id", delete(tags::delete_tag))
        .route(
            "/item/:item_id/tag/:tag_id",
            post(tags::attach_tag).delete(tags::detach_tag),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().merge(public).merge(protected)
}
