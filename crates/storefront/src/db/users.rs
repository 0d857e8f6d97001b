//! User repository for database operations.
//!
//! Queries are runtime-checked and decode through an internal row type, so
//! domain types never expose raw database values (in particular the
//! password hash stays inside this module's call paths).

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velvet_mango_core::{Email, Permission, UserId};

use super::RepositoryError;
use crate::models::user::User;

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for `PostgreSQL` user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    permissions: Vec<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&row.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let permissions = row
            .permissions
            .iter()
            .map(|label| Permission::parse(label))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid permission in database: {e}"))
            })?;

        Ok(Self {
            id: UserId::new(row.id),
            email,
            name: row.name,
            permissions,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Row type for queries that also need the password hash.
#[derive(Debug, sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

const USER_COLUMNS: &str = "id, email, name, permissions, created_at, updated_at";

fn permission_labels(permissions: &[Permission]) -> Vec<String> {
    permissions.iter().map(|p| p.as_str().to_owned()).collect()
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {USER_COLUMNS} FROM storefront."user" WHERE id = $1"#
        ))
        .bind(id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"SELECT {USER_COLUMNS} FROM storefront."user" WHERE email = $1"#
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Create a new user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the email already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(
        &self,
        email: &Email,
        name: &str,
        password_hash: &str,
        permissions: &[Permission],
    ) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            INSERT INTO storefront."user" (email, name, password_hash, permissions)
            VALUES ($1, $2, $3, $4)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email.as_str())
        .bind(name)
        .bind(password_hash)
        .bind(permission_labels(permissions))
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("email already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        row.try_into()
    }

    /// Get a user and their password hash by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn get_with_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(&format!(
            r#"SELECT {USER_COLUMNS}, password_hash FROM storefront."user" WHERE email = $1"#
        ))
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        match row {
            Some(r) => {
                let user: User = r.user.try_into()?;
                Ok(Some((user, r.password_hash)))
            }
            None => Ok(None),
        }
    }

    /// Store a password-reset token and its expiry on a user.
    ///
    /// Both fields are written together, keeping the both-present-or-both-
    /// absent invariant.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user no longer exists.
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn set_reset_token(
        &self,
        id: UserId,
        token: &str,
        expiry: DateTime<Utc>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            UPDATE storefront."user"
            SET reset_token = $2, reset_token_expiry = $3, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id.as_i32())
        .bind(token)
        .bind(expiry)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Consume a reset token: store the new password hash and clear both
    /// reset fields in one conditional write.
    ///
    /// The `WHERE` clause matches the token and applies the validity window
    /// (`reset_token_expiry >= window_start`), so validation and consumption
    /// are a single atomic statement - a token can never be replayed, even
    /// by two concurrent resets racing each other.
    ///
    /// Returns `None` when no user matched: the token is unknown, outside
    /// its window, or was consumed by a concurrent request.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn consume_reset_token(
        &self,
        token: &str,
        new_password_hash: &str,
        window_start: DateTime<Utc>,
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE storefront."user"
            SET password_hash = $2, reset_token = NULL, reset_token_expiry = NULL,
                updated_at = now()
            WHERE reset_token = $1 AND reset_token_expiry >= $3
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(token)
        .bind(new_password_hash)
        .bind(window_start)
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    /// Replace a user's permission set wholesale.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the data is invalid.
    pub async fn update_permissions(
        &self,
        id: UserId,
        permissions: &[Permission],
    ) -> Result<Option<User>, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(&format!(
            r#"
            UPDATE storefront."user"
            SET permissions = $2, updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id.as_i32())
        .bind(permission_labels(permissions))
        .fetch_optional(self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_labels() {
        let labels = permission_labels(&[Permission::Admin, Permission::ItemDelete]);
        assert_eq!(labels, vec!["ADMIN".to_owned(), "ITEMDELETE".to_owned()]);
    }

    #[test]
    fn test_row_conversion_rejects_unknown_permission() {
        let row = UserRow {
            id: 1,
            email: "user@example.com".to_owned(),
            name: "User".to_owned(),
            permissions: vec!["SUPERPOWERS".to_owned()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            User::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_row_conversion_rejects_bad_email() {
        let row = UserRow {
            id: 1,
            email: "not-an-email".to_owned(),
            name: "User".to_owned(),
            permissions: vec![],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert!(matches!(
            User::try_from(row),
            Err(RepositoryError::DataCorruption(_))
        ));
    }
}
