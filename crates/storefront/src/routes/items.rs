//! Item route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};

use velvet_mango_core::{ItemId, UserId};

use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::item::{Item, ItemChanges, NewItem};
use crate::services::items::ItemService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Create-item request body.
#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
    /// Price in cents.
    pub price: i32,
    pub image: Option<String>,
    pub large_image: Option<String>,
}

/// Update-item request body. Missing fields are left unchanged.
#[derive(Debug, Deserialize, Default)]
pub struct UpdateItemRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i32>,
    pub image: Option<String>,
    pub large_image: Option<String>,
}

/// Item payload returned by item mutations.
#[derive(Debug, Serialize)]
pub struct ItemResponse {
    pub id: ItemId,
    pub user_id: UserId,
    pub title: String,
    pub description: String,
    pub price: i32,
    pub image: Option<String>,
    pub large_image: Option<String>,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        Self {
            id: item.id,
            user_id: item.user_id,
            title: item.title,
            description: item.description,
            price: item.price,
            image: item.image,
            large_image: item.large_image,
        }
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List a new item for sale, owned by the caller.
pub async fn create_item(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let new_item = NewItem {
        title: req.title,
        description: req.description,
        price: req.price,
        image: req.image,
        large_image: req.large_image,
    };

    let item = ItemService::new(state.pool())
        .create(&caller, &new_item)
        .await?;

    Ok(Json(item.into()))
}

/// Apply a partial update to an item.
pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<ItemResponse>, AppError> {
    let changes = ItemChanges {
        title: req.title,
        description: req.description,
        price: req.price,
        image: req.image,
        large_image: req.large_image,
    };

    let item = ItemService::new(state.pool())
        .update(ItemId::new(id), &changes)
        .await?;

    Ok(Json(item.into()))
}

/// Delete an item. Allowed for the owner, or for callers holding
/// ADMIN or ITEMDELETE.
pub async fn delete_item(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<ItemResponse>, AppError> {
    let item = ItemService::new(state.pool())
        .delete(&caller, ItemId::new(id))
        .await?;

    Ok(Json(item.into()))
}
