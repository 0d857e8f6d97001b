//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] velvet_mango_core::EmailError),

    /// Invalid credentials (wrong password).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// User not found.
    #[error("user not found")]
    UserNotFound,

    /// Email is already registered.
    #[error("email already registered")]
    EmailTaken,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// New password and confirmation differ.
    #[error("passwords don't match")]
    PasswordMismatch,

    /// Reset token unknown, consumed, or outside its validity window.
    #[error("reset token is invalid or expired")]
    InvalidOrExpiredToken,

    /// Caller lacks the required permission.
    #[error("permission denied")]
    Forbidden,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
