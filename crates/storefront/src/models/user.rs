//! User domain types.

use chrono::{DateTime, Utc};

use velvet_mango_core::{Email, Permission, UserId};

/// A storefront user (domain type).
///
/// The password hash never leaves the repository layer; this type is safe
/// to serialize into responses via `routes::UserResponse`.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// User's email address (lowercased).
    pub email: Email,
    /// Display name.
    pub name: String,
    /// Permission labels, in insertion order.
    pub permissions: Vec<Permission>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// The caller context attached to an authenticated request.
///
/// Built by the auth extractor from a verified session token plus a user
/// lookup. This is the only carrier of identity and permissions through the
/// mutation paths - there is no process-wide session state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// Authenticated user ID.
    pub id: UserId,
    /// The caller's email address.
    pub email: Email,
    /// The caller's permission labels.
    pub permissions: Vec<Permission>,
}

impl CurrentUser {
    /// Whether the caller holds at least one of the given permissions.
    ///
    /// Plain intersection - ADMIN grants nothing unless listed in `one_of`.
    #[must_use]
    pub fn has_any(&self, one_of: &[Permission]) -> bool {
        Permission::intersects(&self.permissions, one_of)
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            permissions: user.permissions,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn caller(permissions: Vec<Permission>) -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            email: Email::parse("caller@example.com").unwrap(),
            permissions,
        }
    }

    #[test]
    fn test_has_any_intersection() {
        let c = caller(vec![Permission::User, Permission::ItemDelete]);
        assert!(c.has_any(&[Permission::Admin, Permission::ItemDelete]));
        assert!(!c.has_any(&[Permission::Admin, Permission::PermissionUpdate]));
    }

    #[test]
    fn test_has_any_no_permissions() {
        let c = caller(vec![]);
        assert!(!c.has_any(&[Permission::Admin]));
    }
}
