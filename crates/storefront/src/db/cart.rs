//! Cart repository for database operations.
//!
//! The cart table carries a `UNIQUE (user_id, item_id)` constraint; the
//! upsert leans on it so that "check existing line, then create-or-update"
//! is a single conditional write inside the store rather than a
//! read-then-write pair in the application layer.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velvet_mango_core::{CartItemId, ItemId, UserId};

use super::RepositoryError;
use crate::models::cart::CartItem;

/// Internal row type for `PostgreSQL` cart queries.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: i32,
    user_id: i32,
    item_id: i32,
    quantity: i32,
    added_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        Self {
            id: CartItemId::new(row.id),
            user_id: UserId::new(row.user_id),
            item_id: ItemId::new(row.item_id),
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

const CART_COLUMNS: &str = "id, user_id, item_id, quantity, added_at";

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Add one unit of an item to a user's cart.
    ///
    /// Inserts a fresh line with quantity 1, or bumps the existing line's
    /// quantity by 1 when the (user, item) pair is already present. Two
    /// concurrent adds for the same pair serialize on the unique constraint
    /// - neither can observe "absent" and insert a duplicate row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn upsert_line(
        &self,
        user_id: UserId,
        item_id: ItemId,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            r#"
            INSERT INTO storefront.cart_item (user_id, item_id, quantity)
            VALUES ($1, $2, 1)
            ON CONFLICT (user_id, item_id)
            DO UPDATE SET quantity = cart_item.quantity + 1
            RETURNING {CART_COLUMNS}
            "#
        ))
        .bind(user_id.as_i32())
        .bind(item_id.as_i32())
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::NotFound;
            }
            RepositoryError::Database(e)
        })?;

        Ok(row.into())
    }

    /// Get a cart line by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(&format!(
            "SELECT {CART_COLUMNS} FROM storefront.cart_item WHERE id = $1"
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Delete a cart line owned by `owner`. Returns `true` if a row was
    /// removed.
    ///
    /// The owner condition is part of the statement, so a line can never be
    /// deleted out from under a different user even if the caller-side
    /// ownership check raced a concurrent mutation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_owned(
        &self,
        id: CartItemId,
        owner: UserId,
    ) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM storefront.cart_item WHERE id = $1 AND user_id = $2")
                .bind(id.as_i32())
                .bind(owner.as_i32())
                .execute(self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
