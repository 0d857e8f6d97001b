//! Item repository for database operations.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velvet_mango_core::{ItemId, UserId};

use super::RepositoryError;
use crate::models::item::{Item, ItemChanges, NewItem};

/// Internal row type for `PostgreSQL` item queries.
#[derive(Debug, sqlx::FromRow)]
struct ItemRow {
    id: i32,
    user_id: i32,
    title: String,
    description: String,
    price: i32,
    image: Option<String>,
    large_image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ItemRow> for Item {
    fn from(row: ItemRow) -> Self {
        Self {
            id: ItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            description: row.description,
            price: row.price,
            image: row.image,
            large_image: row.large_image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const ITEM_COLUMNS: &str =
    "id, user_id, title, description, price, image, large_image, created_at, updated_at";

/// Repository for item database operations.
pub struct ItemRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ItemRepository<'a> {
    /// Create a new item repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: ItemId) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "SELECT {ITEM_COLUMNS} FROM storefront.item WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a new item owned by `seller`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn create(&self, seller: UserId, item: &NewItem) -> Result<Item, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            INSERT INTO storefront.item (user_id, title, description, price, image, large_image)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(seller.as_i32())
        .bind(&item.title)
        .bind(&item.description)
        .bind(item.price)
        .bind(&item.image)
        .bind(&item.large_image)
        .fetch_one(self.pool)
        .await?;

        Ok(row.into())
    }

    /// Apply a partial update to an item. Unset fields keep their value.
    ///
    /// Returns `None` if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update(
        &self,
        id: ItemId,
        changes: &ItemChanges,
    ) -> Result<Option<Item>, RepositoryError> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            r#"
            UPDATE storefront.item
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image = COALESCE($5, image),
                large_image = COALESCE($6, large_image),
                updated_at = now()
            WHERE id = $1
            RETURNING {ITEM_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.price)
        .bind(&changes.image)
        .bind(&changes.large_image)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete an item. Returns `true` if a row was removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, id: ItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM storefront.item WHERE id = $1")
            .bind(id.as_i32())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
