//! Unified error handling for the storefront API.
//!
//! Every mutation resolves to either a success payload or one of these
//! typed failures. Authorization and validation failures are raised before
//! any mutating store call, so a rejected request leaves no partial state.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::items::ItemError;

/// Application-level error type for the storefront API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request carries no resolved user identity.
    #[error("You must be logged in to do that!")]
    Unauthenticated,

    /// Email/password pair did not verify.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Caller lacks the required permission or ownership.
    #[error("You don't have permission to do that!")]
    Forbidden,

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// New password and confirmation differ.
    #[error("Passwords don't match")]
    PasswordMismatch,

    /// Reset token is unknown, already used, or outside its window.
    #[error("This token is either invalid or expired")]
    InvalidOrExpiredToken,

    /// Input failed validation (bad email, weak password, unknown label).
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Unique constraint conflict (e.g. email already registered).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront request error"
            );
        }

        let status = match &self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthenticated | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::PasswordMismatch | Self::InvalidOrExpiredToken | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_) | Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidEmail(e) => Self::Validation(e.to_string()),
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidCredentials => Self::InvalidCredentials,
            AuthError::UserNotFound => Self::NotFound("user".to_string()),
            AuthError::EmailTaken => Self::Conflict("email already registered".to_string()),
            AuthError::PasswordMismatch => Self::PasswordMismatch,
            AuthError::InvalidOrExpiredToken => Self::InvalidOrExpiredToken,
            AuthError::Forbidden => Self::Forbidden,
            AuthError::PasswordHash => Self::Internal("password hashing failed".to_string()),
            AuthError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<CartError> for AppError {
    fn from(err: CartError) -> Self {
        match err {
            CartError::ItemNotFound => Self::NotFound("item".to_string()),
            CartError::CartItemNotFound => Self::NotFound("cart item".to_string()),
            CartError::NotOwner => Self::Forbidden,
            CartError::Repository(e) => Self::Database(e),
        }
    }
}

impl From<ItemError> for AppError {
    fn from(err: ItemError) -> Self {
        match err {
            ItemError::NotFound => Self::NotFound("item".to_string()),
            ItemError::Forbidden => Self::Forbidden,
            ItemError::Repository(e) => Self::Database(e),
        }
    }
}
