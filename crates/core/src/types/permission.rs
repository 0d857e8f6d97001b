//! Permission labels for capability checks.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown permission label.
#[derive(thiserror::Error, Debug, Clone)]
#[error("unknown permission label: {0}")]
pub struct PermissionError(pub String);

/// A named capability held by a user.
///
/// Permissions are a flat label set with no hierarchy: `Admin` does not
/// structurally imply anything else, so it must be listed explicitly in every
/// check where elevated access is intended.
///
/// The wire and database representation is the uppercase label (`ADMIN`,
/// `ITEMDELETE`, ...), matching the storefront's permission picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "ADMIN")]
    Admin,
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "ITEMCREATE")]
    ItemCreate,
    #[serde(rename = "ITEMUPDATE")]
    ItemUpdate,
    #[serde(rename = "ITEMDELETE")]
    ItemDelete,
    #[serde(rename = "PERMISSIONUPDATE")]
    PermissionUpdate,
}

impl Permission {
    /// All known permission labels, in display order.
    pub const ALL: [Self; 6] = [
        Self::Admin,
        Self::User,
        Self::ItemCreate,
        Self::ItemUpdate,
        Self::ItemDelete,
        Self::PermissionUpdate,
    ];

    /// The uppercase label for this permission.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::User => "USER",
            Self::ItemCreate => "ITEMCREATE",
            Self::ItemUpdate => "ITEMUPDATE",
            Self::ItemDelete => "ITEMDELETE",
            Self::PermissionUpdate => "PERMISSIONUPDATE",
        }
    }

    /// Parse a permission from its uppercase label.
    ///
    /// # Errors
    ///
    /// Returns `PermissionError` for labels outside the known set.
    pub fn parse(s: &str) -> Result<Self, PermissionError> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "USER" => Ok(Self::User),
            "ITEMCREATE" => Ok(Self::ItemCreate),
            "ITEMUPDATE" => Ok(Self::ItemUpdate),
            "ITEMDELETE" => Ok(Self::ItemDelete),
            "PERMISSIONUPDATE" => Ok(Self::PermissionUpdate),
            other => Err(PermissionError(other.to_owned())),
        }
    }

    /// Whether `held` grants at least one of the permissions in `one_of`.
    ///
    /// Plain set intersection - no label implies another.
    #[must_use]
    pub fn intersects(held: &[Self], one_of: &[Self]) -> bool {
        held.iter().any(|p| one_of.contains(p))
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Permission {
    type Err = PermissionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_roundtrip() {
        for p in Permission::ALL {
            assert_eq!(Permission::parse(p.as_str()).unwrap(), p);
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert!(Permission::parse("SUPERADMIN").is_err());
        assert!(Permission::parse("admin").is_err());
    }

    #[test]
    fn test_serde_uses_uppercase_labels() {
        let json = serde_json::to_string(&Permission::ItemDelete).unwrap();
        assert_eq!(json, "\"ITEMDELETE\"");
        let parsed: Permission = serde_json::from_str("\"PERMISSIONUPDATE\"").unwrap();
        assert_eq!(parsed, Permission::PermissionUpdate);
    }

    #[test]
    fn test_intersects() {
        let held = [Permission::User, Permission::ItemCreate];
        assert!(Permission::intersects(
            &held,
            &[Permission::ItemCreate, Permission::Admin]
        ));
        assert!(!Permission::intersects(
            &held,
            &[Permission::Admin, Permission::ItemDelete]
        ));
    }

    #[test]
    fn test_admin_is_not_implied() {
        // ADMIN is a plain label: holding it only matters where a check
        // explicitly lists it.
        let held = [Permission::Admin];
        assert!(!Permission::intersects(&held, &[Permission::ItemDelete]));
        assert!(Permission::intersects(
            &held,
            &[Permission::Admin, Permission::ItemDelete]
        ));
    }

    #[test]
    fn test_intersects_empty() {
        assert!(!Permission::intersects(&[], &[Permission::Admin]));
        assert!(!Permission::intersects(&[Permission::Admin], &[]));
    }
}
