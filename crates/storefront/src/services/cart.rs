//! Cart mutation engine.
//!
//! Owner-scoped, idempotent cart line mutations. The add path is a single
//! store-side upsert (see [`crate::db::cart`]); the remove path deletes a
//! whole line after the explicit ownership check - quantity is never
//! decremented.

use sqlx::PgPool;
use thiserror::Error;

use velvet_mango_core::{CartItemId, ItemId};

use crate::db::RepositoryError;
use crate::db::cart::CartRepository;
use crate::models::cart::CartItem;
use crate::models::user::CurrentUser;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The item being added does not exist.
    #[error("item not found")]
    ItemNotFound,

    /// The cart line does not exist.
    #[error("cart item not found")]
    CartItemNotFound,

    /// The cart line belongs to a different user.
    #[error("cart item belongs to another user")]
    NotOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart mutation service.
pub struct CartService<'a> {
    cart: CartRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            cart: CartRepository::new(pool),
        }
    }

    /// Add one unit of an item to the caller's cart.
    ///
    /// Creates the line with quantity 1, or bumps the existing line's
    /// quantity. There is no upper bound on quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if the item doesn't exist.
    pub async fn add_item(
        &self,
        caller: &CurrentUser,
        item_id: ItemId,
    ) -> Result<CartItem, CartError> {
        self.cart
            .upsert_line(caller.id, item_id)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => CartError::ItemNotFound,
                other => CartError::Repository(other),
            })
    }

    /// Remove a cart line entirely.
    ///
    /// # Errors
    ///
    /// Returns `CartError::CartItemNotFound` if no such line exists.
    /// Returns `CartError::NotOwner` if the line belongs to someone else;
    /// the line is left untouched.
    pub async fn remove_item(
        &self,
        caller: &CurrentUser,
        cart_item_id: CartItemId,
    ) -> Result<CartItem, CartError> {
        let line = self
            .cart
            .get_by_id(cart_item_id)
            .await?
            .ok_or(CartError::CartItemNotFound)?;

        if line.user_id != caller.id {
            return Err(CartError::NotOwner);
        }

        // Owner re-checked inside the delete statement
        let deleted = self.cart.delete_owned(cart_item_id, caller.id).await?;
        if !deleted {
            return Err(CartError::CartItemNotFound);
        }

        Ok(line)
    }
}
