//! Tag repository, including item-tag links
//!
//! The same-store invariant for links is enforced here rather than in the
//! schema: an item and a tag may only be linked when both rows carry the
//! same `store_id`.
//!
//! Author: hephaex@gmail.com

use super::RepositoryError;
use bazaar_core::model::{Item, Tag};
use sqlx::SqlitePool;

/// Repository for tag database operations
pub struct TagRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TagRepository<'a> {
    /// Create a new tag repository
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tags
    pub async fn list(&self) -> Result<Vec<Tag>, RepositoryError> {
        let tags = sqlx::query_as::<_, Tag>("SELECT id, name, store_id FROM tags ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        Ok(tags)
    }

    /// Get a tag by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such tag exists.
    pub async fn get(&self, id: i64) -> Result<Tag, RepositoryError> {
        sqlx::query_as::<_, Tag>("SELECT id, name, store_id FROM tags WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Fetch the items a tag is attached to
    pub async fn items_for_tag(&self, tag_id: i64) -> Result<Vec<Item>, RepositoryError> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT i.id, i.name, i.price, i.store_id FROM items i \
             JOIN items_tags it ON it.item_id = i.id \
             WHERE it.tag_id = ? ORDER BY i.id",
        )
        .bind(tag_id)
        .fetch_all(self.pool)
        .await?;

        Ok(items)
    }

    /// Create a tag in a store.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::ForeignKey` if the store does not exist.
    pub async fn create(&self, name: &str, store_id: i64) -> Result<Tag, RepositoryError> {
        sqlx::query_as::<_, Tag>(
            "INSERT INTO tags (name, store_id) VALUES (?, ?) RETURNING id, name, store_id",
        )
        .bind(name)
        .bind(store_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            RepositoryError::from_constraint(e, "tag already exists", "store does not exist")
        })
    }

    /// Delete a tag by id.
    ///
    /// Rejected while any item still carries the tag.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no such tag exists and
    /// `RepositoryError::ForeignKey` if the tag is still attached to items.
    pub async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .map_err(|e| {
                RepositoryError::from_constraint(
                    e,
                    "tag is referenced",
                    "tag is still attached to items",
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Attach a tag to an item.
    ///
    /// Both must belong to the same store. Attaching an already-attached
    /// tag is a no-op, so the operation is idempotent.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if either record is missing and
    /// `RepositoryError::Conflict` when they belong to different stores.
    pub async fn attach(&self, item_id: i64, tag_id: i64) -> Result<(), RepositoryError> {
        // One transaction for the existence checks and the insert, so a
        // concurrent item or tag delete cannot slip in between them.
        let mut tx = self.pool.begin().await?;

        let item_store = sqlx::query_scalar::<_, i64>("SELECT store_id FROM items WHERE id = ?")
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        let tag_store = sqlx::query_scalar::<_, i64>("SELECT store_id FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if item_store != tag_store {
            return Err(RepositoryError::Conflict(
                "item and tag belong to different stores".to_string(),
            ));
        }

        sqlx::query("INSERT OR IGNORE INTO items_tags (item_id, tag_id) VALUES (?, ?)")
            .bind(item_id)
            .bind(tag_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Detach a tag from an item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the link does not exist.
    pub async fn detach(&self, item_id: i64, tag_id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM items_tags WHERE item_id = ? AND tag_id = ?")
            .bind(item_id)
            .bind(tag_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{test_pool, ItemRepository, StoreRepository};

    #[tokio::test]
    async fn test_attach_same_store_is_idempotent() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);
        let tags = TagRepository::new(&pool);

        let store = stores.create("Fruit Stand").await.unwrap();
        let item = items.create("Apple", 1.2, store.id).await.unwrap();
        let tag = tags.create("fresh", store.id).await.unwrap();

        tags.attach(item.id, tag.id).await.unwrap();
        tags.attach(item.id, tag.id).await.unwrap();

        let attached = items.tags_for_item(item.id).await.unwrap();
        assert_eq!(attached.len(), 1);
        assert_eq!(attached[0].id, tag.id);
    }

    #[tokio::test]
    async fn test_attach_across_stores_is_rejected() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);
        let tags = TagRepository::new(&pool);

        let fruit = stores.create("Fruit Stand").await.unwrap();
        let tools = stores.create("Hardware").await.unwrap();
        let item = items.create("Apple", 1.2, fruit.id).await.unwrap();
        let tag = tags.create("steel", tools.id).await.unwrap();

        let err = tags.attach(item.id, tag.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
        assert!(items.tags_for_item(item.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_attach_missing_records() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);
        let tags = TagRepository::new(&pool);

        let store = stores.create("Fruit Stand").await.unwrap();
        let item = items.create("Apple", 1.2, store.id).await.unwrap();
        let tag = tags.create("fresh", store.id).await.unwrap();

        // Unknown tag, then a just-deleted item: both are plain not-found,
        // never a raw constraint error.
        let err = tags.attach(item.id, 999).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));

        items.delete(item.id).await.unwrap();
        let err = tags.attach(item.id, tag.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_detach_missing_link() {
        let pool = test_pool().await;
        let tags = TagRepository::new(&pool);

        let err = tags.detach(1, 1).await.unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_delete_attached_tag_is_rejected() {
        let pool = test_pool().await;
        let stores = StoreRepository::new(&pool);
        let items = ItemRepository::new(&pool);
        let tags = TagRepository::new(&pool);

        let store = stores.create("Fruit Stand").await.unwrap();
        let item = items.create("Apple", 1.2, store.id).await.unwrap();
        let tag = tags.create("fresh", store.id).await.unwrap();
        tags.attach(item.id, tag.id).await.unwrap();

        let err = tags.delete(tag.id).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ForeignKey(_)));

        tags.detach(item.id, tag.id).await.unwrap();
        tags.delete(tag.id).await.unwrap();
    }
}
