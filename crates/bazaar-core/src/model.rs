//! Domain models for stores, items, tags, and users
//!
//! These structs map directly to the relational tables created at startup.
//! The password hash is never serialized in API responses.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A store owning items and tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Store {
    /// Unique store identifier
    pub id: i64,
    /// Store name (globally unique)
    pub name: String,
}

/// An item for sale in a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Item {
    /// Unique item identifier
    pub id: i64,
    /// Item name
    pub name: String,
    /// Item price
    pub price: f64,
    /// Owning store (foreign key, required)
    pub store_id: i64,
}

/// A tag scoped to a store, attachable to items of the same store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct Tag {
    /// Unique tag identifier
    pub id: i64,
    /// Tag name
    pub name: String,
    /// Owning store (foreign key, required)
    pub store_id: i64,
}

/// A registered user account
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
pub struct User {
    /// Unique user identifier
    pub id: i64,
    /// Login name (globally unique)
    pub username: String,
    /// Argon2id password hash. Never serialized in API responses.
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    /// The first registered account is the designated admin identity.
    ///
    /// This is a policy stub pending a real role/permission model; it only
    /// exists so the `is_admin` claim has a well-defined source.
    pub fn is_admin(&self) -> bool {
        self.id == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: 1,
            username: "alice".to_string(),
            password_hash: "$argon2id$v=19$m=65536,t=3,p=4$secret".to_string(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(json.contains("alice"));
        assert!(!json.contains("argon2id"));
    }

    #[test]
    fn test_first_user_is_admin() {
        let first = User {
            id: 1,
            username: "a".to_string(),
            password_hash: String::new(),
        };
        let second = User {
            id: 2,
            username: "b".to_string(),
            password_hash: String::new(),
        };

        assert!(first.is_admin());
        assert!(!second.is_admin());
    }

    #[test]
    fn test_item_roundtrip() {
        let item = Item {
            id: 7,
            name: "Hammer".to_string(),
            price: 12.5,
            store_id: 3,
        };

        let json = serde_json::to_string(&item).unwrap();
        let back: Item = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
