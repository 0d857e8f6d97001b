//! Cart domain types.

use chrono::{DateTime, Utc};

use velvet_mango_core::{CartItemId, ItemId, UserId};

/// A line in a user's cart (domain type).
///
/// At most one line exists per (user, item) pair; repeated adds merge into
/// the quantity instead of inserting duplicate rows.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique cart line ID.
    pub id: CartItemId,
    /// The cart owner.
    pub user_id: UserId,
    /// The item in the cart.
    pub item_id: ItemId,
    /// Quantity, always >= 1.
    pub quantity: i32,
    /// When this line was first added.
    pub added_at: DateTime<Utc>,
}
