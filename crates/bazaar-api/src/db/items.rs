//! Item repository
//!
//! Related tags are fetched with an explicit query; there is no lazy
//! loading anywhere in the data layer.
//!
//! Author: hephaex@gmail.com

use super::RepositoryError;
use bazaar_core::model::{Item, Tag};
use sqlx::SqlitePool;

/// Repository for item database operations
pub struct ItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all items
    pub async fn list(&self) -> Result<Vec<Item>, RepositoryError> {
        let items =
            sqlx::query_as::<_, Item>("SELECT id, name, price, store_id FROM items ORDER BY id")
                .fetch_all(self.pool)
                .await?;

        Ok(items)
    }

    /// Get an item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such item exists.
    pub async fn get(&self, id: i64) -> Result<Item, RepositoryError> {
        sqlx::query_as::<_, Item>("SELECT id, name, price, store_id FROM items WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fetch the tags attached to an item
    pub async fn tags_for_item(&self, item_id: i64) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>(
            "SELECT t.id, t.name, t.store_id FROM tags t \
             JOIN items_tags it ON it.tag_id = t.id \
             WHERE it.item_id = ? ORDER BY t.id",
        )
        .bind(item_id)
        .fetch_all(self.pool)
        .await?;

        Ok(tags)
    }

    /// Create an item in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the store does not exist.
    pub async fn create(&self, name: &str, price: f64, store_id: i64) -> Result<Item, RepositoryError> {
        sqlx::query_as::<_, Item>(
            "INSERT INTO items (name, price, store_id) VALUES (?, ?, ?) \
             RETURNING id, name, price, store_id",
        )
        .bind(name)
        .bind(price)
        .bind(store_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_constraint(e, "item already exists", "store does not exist")
        })
    }

    /// Update an item's name and price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such item exists.
    pub async fn update(&self, id: i64, name: &str, price: f64) -> Result<Item, RepositoryError> {
        sqlx::query_as::<_, Item>(
            "UPDATE items SET name = ?, price = ? WHERE id = ? \
             RETURNING id, name, price, store_id",
        )
        .bind(name)
        .bind(price)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    /// Delete an item and its tag links in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such item exists.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM items_tags WHERE item_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM items WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, StoreRepository, TagRepository};

    #[tokio::test]
    async fn test_create_requires_existing_store() {
        let pool = test_pool().await;
        let items = ItemRepository::new(&pool);

        let err = items.create("Apple", 1.2, 999).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKey(_)));
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);

        let store = stores.create("Fruit Stand").await.unwrap();
        let item = items.create("Apple", 1.2, store.id).await.unwrap();
        assert_eq!(item.store_id, store.id);

        let updated = items.update(item.id, "Green Apple", 1.5).await.unwrap();
        assert_eq!(updated.name, "Green Apple");
        assert_eq!(updated.price, 1.5);

        items.delete(item.id).await.unwrap();
        assert!(matches!(
            items.get(item.id).await.unwrap_err(),
            RepositoryError::NotFound
        ));
    }

    #[tokio::test]
    async fn test_update_missing_item() {
        let pool = test_pool().await;
        let items = ItemRepository::new(&pool);

        let err = items.update(5, "x", 1.0).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_removes_tag_links() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);
        let tags = TagRepository::new(&pool);

        let store = stores.create("Fruit Stand").await.unwrap();
        let item = items.create("Apple", 1.2, store.id).await.unwrap();
        let tag = tags.create("fresh", store.id).await.unwrap();
        tags.attach(item.id, tag.id).await.unwrap();

        items.delete(item.id).await.unwrap();

        let remaining = tags.items_for_tag(tag.id).await.unwrap();
        assert!(remaining.is_empty());
    }
}
