//! OpenAPI documentation
//!
//! Author: hephaex@gmail.com

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use bazaar_core::model::{Item, Store, Tag, User};

use crate::auth::models::{
    AccessToken, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest, TokenPair,
};
use crate::error::ApiError;
use crate::handlers::{
    health::{self, HealthResponse},
    items::{self, ItemCreate, ItemUpdate, ItemWithTags},
    stores::{self, StoreCreate},
    tags::{self, TagCreate, TagWithItems},
    users,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        users::register,
        users::login,
        users::refresh,
        users::logout,
        users::get_user,
        users::delete_user,
        stores::list_stores,
        stores::get_store,
        stores::create_store,
        stores::delete_store,
        items::list_items,
        items::get_item,
        items::create_item,
        items::update_item,
        items::delete_item,
        tags::list_tags,
        tags::get_tag,
        tags::create_tag,
        tags::delete_tag,
        tags::attach_tag,
        tags::detach_tag,
        health::health,
        health::ready,
    ),
    components(schemas(
        Store,
        Item,
        Tag,
        User,
        StoreCreate,
        ItemCreate,
        ItemUpdate,
        ItemWithTags,
        TagCreate,
        TagWithItems,
        RegisterRequest,
        LoginRequest,
        RefreshRequest,
        TokenPair,
        AccessToken,
        MessageResponse,
        HealthResponse,
        ApiError,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "users", description = "Registration, login, and token lifecycle"),
        (name = "stores", description = "Store management"),
        (name = "items", description = "Item management"),
        (name = "tags", description = "Tag management and item-tag links"),
        (name = "health", description = "Liveness and readiness probes")
    ),
    info(
        title = "Bazaar API",
        description = "Store, item, and tag management with JWT authentication"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
