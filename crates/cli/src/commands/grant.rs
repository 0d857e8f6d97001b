//! Permission management commands.
//!
//! # Usage
//!
//! ```bash
//! vm-cli grant -e admin@example.com -p PERMISSIONUPDATE
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_DATABASE_URL` - `PostgreSQL` connection string (falls back
//!   to `DATABASE_URL`)

use sqlx::PgPool;
use thiserror::Error;

use velvet_mango_core::{Email, Permission};

/// Errors that can occur during permission operations.
#[derive(Debug, Error)]
pub enum GrantError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unknown permission label.
    #[error("Invalid permission: {0}. Valid labels: ADMIN, USER, ITEMCREATE, ITEMUPDATE, ITEMDELETE, PERMISSIONUPDATE")]
    InvalidPermission(String),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with that email exists.
    #[error("No user found for email: {0}")]
    UserNotFound(String),
}

/// Grant a permission label to an existing user.
///
/// Idempotent: granting a label the user already holds is a no-op.
///
/// # Errors
///
/// Returns `GrantError` if the label or email is invalid, the user does
/// not exist, or the database operation fails.
pub async fn permission(email: &str, label: &str) -> Result<(), GrantError> {
    dotenvy::dotenv().ok();

    let permission: Permission = label
        .parse()
        .map_err(|_| GrantError::InvalidPermission(label.to_owned()))?;
    let email = Email::parse(email).map_err(|e| GrantError::InvalidEmail(e.to_string()))?;

    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| GrantError::MissingEnvVar("STOREFRONT_DATABASE_URL"))?;

    tracing::info!("Connecting to storefront database...");
    let pool = PgPool::connect(&database_url).await?;

    let result = sqlx::query(
        r#"
        UPDATE storefront."user"
        SET permissions = array_append(permissions, $2), updated_at = now()
        WHERE email = $1 AND NOT (permissions @> ARRAY[$2]::text[])
        "#,
    )
    .bind(email.as_str())
    .bind(permission.as_str())
    .execute(&pool)
    .await?;

    if result.rows_affected() == 0 {
        // Either the user doesn't exist or they already hold the label.
        let exists: Option<(i32,)> =
            sqlx::query_as(r#"SELECT id FROM storefront."user" WHERE email = $1"#)
                .bind(email.as_str())
                .fetch_optional(&pool)
                .await?;

        if exists.is_none() {
            return Err(GrantError::UserNotFound(email.into_inner()));
        }
        tracing::info!("User {} already holds {}", email, permission);
        return Ok(());
    }

    tracing::info!("Granted {} to {}", permission, email);
    Ok(())
}
