//! Cart route handlers.
//!
//! Both operations require an authenticated caller; the cart is scoped to
//! its owner throughout.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;

use velvet_mango_core::{CartItemId, ItemId, UserId};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::cart::CartItem;
use crate::services::cart::CartService;
use crate::state::AppState;

/// Cart line payload returned by cart mutations.
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: CartItemId,
    pub user_id: UserId,
    pub item_id: ItemId,
    pub quantity: i32,
}

impl From<CartItem> for CartItemResponse {
    fn from(line: CartItem) -> Self {
        Self {
            id: line.id,
            user_id: line.user_id,
            item_id: line.item_id,
            quantity: line.quantity,
        }
    }
}

/// Add one unit of item `{id}` to the caller's cart.
///
/// Repeated adds merge into a single line with an incremented quantity.
pub async fn add_to_cart(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CartItemResponse>, AppError> {
    let line = CartService::new(state.pool())
        .add_item(&caller, ItemId::new(id))
        .await?;

    Ok(Json(line.into()))
}

/// Remove cart line `{id}` entirely.
pub async fn remove_from_cart(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<CartItemResponse>, AppError> {
    let line = CartService::new(state.pool())
        .remove_item(&caller, CartItemId::new(id))
        .await?;

    Ok(Json(line.into()))
}
