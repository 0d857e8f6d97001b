//! Item listing mutations.

use sqlx::PgPool;
use thiserror::Error;

use velvet_mango_core::{ItemId, Permission};

use crate::db::RepositoryError;
use crate::db::items::ItemRepository;
use crate::models::item::{Item, ItemChanges, NewItem};
use crate::models::user::CurrentUser;

/// Permissions that allow deleting an item the caller does not own.
const DELETE_PERMISSIONS: [Permission; 2] = [Permission::Admin, Permission::ItemDelete];

/// Errors that can occur during item operations.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The item does not exist.
    #[error("item not found")]
    NotFound,

    /// Caller neither owns the item nor holds a delete permission.
    #[error("permission denied")]
    Forbidden,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Item mutation service.
pub struct ItemService<'a> {
    items: ItemRepository<'a>,
}

impl<'a> ItemService<'a> {
    /// Create a new item service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            items: ItemRepository::new(pool),
        }
    }

    /// List a new item for sale, owned by the caller.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::Repository` if the database operation fails.
    pub async fn create(&self, seller: &CurrentUser, item: &NewItem) -> Result<Item, ItemError> {
        let item = self.items.create(seller.id, item).await?;
        Ok(item)
    }

    /// Apply a partial update to an item.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the item doesn't exist.
    pub async fn update(&self, id: ItemId, changes: &ItemChanges) -> Result<Item, ItemError> {
        self.items
            .update(id, changes)
            .await?
            .ok_or(ItemError::NotFound)
    }

    /// Delete an item.
    ///
    /// Allowed for the item's owner, or for callers holding ADMIN or
    /// ITEMDELETE. Ownership and permission are separate predicates -
    /// either one suffices.
    ///
    /// # Errors
    ///
    /// Returns `ItemError::NotFound` if the item doesn't exist.
    /// Returns `ItemError::Forbidden` if the caller may not delete it.
    pub async fn delete(&self, caller: &CurrentUser, id: ItemId) -> Result<Item, ItemError> {
        let item = self.items.get_by_id(id).await?.ok_or(ItemError::NotFound)?;

        let owns_item = item.user_id == caller.id;
        if !owns_item && !caller.has_any(&DELETE_PERMISSIONS) {
            return Err(ItemError::Forbidden);
        }

        let deleted = self.items.delete(id).await?;
        if !deleted {
            return Err(ItemError::NotFound);
        }

        Ok(item)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use velvet_mango_core::{Email, UserId};

    fn caller(id: i32, permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(id),
            email: Email::parse("caller@example.com").unwrap(),
            permissions,
        }
    }

    // The ownership-or-permission rule itself is pure; the store-backed
    // paths are covered by the integration tests.
    fn may_delete(caller: &CurrentUser, item_owner: UserId) -> bool {
        item_owner == caller.id || caller.has_any(&DELETE_PERMISSIONS)
    }

    #[test]
    fn test_owner_may_delete_without_permissions() {
        let c = caller(1, vec![]);
        assert!(may_delete(&c, UserId::new(1)));
    }

    #[test]
    fn test_admin_may_delete_others_items() {
        let c = caller(2, vec![Permission::Admin]);
        assert!(may_delete(&c, UserId::new(1)));
    }

    #[test]
    fn test_itemdelete_may_delete_others_items() {
        let c = caller(2, vec![Permission::ItemDelete]);
        assert!(may_delete(&c, UserId::new(1)));
    }

    #[test]
    fn test_unrelated_caller_may_not_delete() {
        let c = caller(2, vec![Permission::User, Permission::ItemCreate]);
        assert!(!may_delete(&c, UserId::new(1)));
    }
}
