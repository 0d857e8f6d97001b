//! Item domain types.

use chrono::{DateTime, Utc};

use velvet_mango_core::{ItemId, UserId};

/// An item for sale (domain type).
///
/// Owned by exactly one user, the seller. Prices are integer cents.
#[derive(Debug, Clone)]
pub struct Item {
    /// Unique item ID.
    pub id: ItemId,
    /// The seller who listed this item.
    pub user_id: UserId,
    /// Item title.
    pub title: String,
    /// Item description.
    pub description: String,
    /// Price in cents.
    pub price: i32,
    /// Thumbnail image URL.
    pub image: Option<String>,
    /// Full-size image URL.
    pub large_image: Option<String>,
    /// When the item was listed.
    pub created_at: DateTime<Utc>,
    /// When the item was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Fields for creating a new item.
#[derive(Debug, Clone)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    pub price: i32,
    pub image: Option<String>,
    pub large_image: Option<String>,
}

/// Partial update of an item. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub image: Option<String>,
    pub large_image: Option<String>,
}
