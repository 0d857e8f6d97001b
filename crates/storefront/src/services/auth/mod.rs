//! Authentication service.
//!
//! Owns the credential lifecycle: signup, signin, password reset, and
//! permission administration. Session-token issuance lives in
//! [`crate::services::token`]; route handlers combine the two.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use velvet_mango_core::{Email, Permission, UserId};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::user::{CurrentUser, User};
use crate::services::reset::{self, ResetToken};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Permission set granted to every new signup.
///
/// Every fresh account starts with full ADMIN.
// TODO: default new signups to USER once the permissions screen supports
// granting roles to existing accounts.
const DEFAULT_SIGNUP_PERMISSIONS: [Permission; 1] = [Permission::Admin];

/// Permissions that allow editing another user's permission set.
const PERMISSION_UPDATE_PERMISSIONS: [Permission; 2] =
    [Permission::Admin, Permission::PermissionUpdate];

/// Authentication service.
///
/// Handles registration, login, password reset, and permission updates.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email, password, and display name.
    ///
    /// The email is lowercased by [`Email::parse`]; the password is hashed
    /// with Argon2id before anything touches the store.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password doesn't meet requirements.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn signup(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, AuthError> {
        let email = Email::parse(email)?;
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(&email, name, &password_hash, &DEFAULT_SIGNUP_PERMISSIONS)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if no user matches the email.
    /// Returns `AuthError::InvalidCredentials` if the password is wrong.
    pub async fn signin(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    /// Generate and persist a password-reset token for a user.
    ///
    /// Returns the user and the fresh token; the caller is responsible for
    /// mailing the link. Token persistence is not rolled back if that
    /// delivery later fails.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the email is unknown.
    pub async fn request_reset(
        &self,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<(User, ResetToken), AuthError> {
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let token = reset::generate(now);
        self.users
            .set_reset_token(user.id, &token.token, token.expiry)
            .await?;

        Ok((user, token))
    }

    /// Complete a password reset.
    ///
    /// The mismatch and strength checks run before any store access; the
    /// token lookup, password write, and token clear are a single
    /// conditional statement in the repository, so a token consumed by one
    /// request can never succeed for another.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordMismatch` if the passwords differ.
    /// Returns `AuthError::WeakPassword` if the new password is too short.
    /// Returns `AuthError::InvalidOrExpiredToken` if the token is unknown,
    /// already consumed, or outside its validity window.
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
        confirm_password: &str,
        now: DateTime<Utc>,
    ) -> Result<User, AuthError> {
        if password != confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let user = self
            .users
            .consume_reset_token(reset_token, &password_hash, reset::window_start(now))
            .await?
            .ok_or(AuthError::InvalidOrExpiredToken)?;

        Ok(user)
    }

    /// Replace a user's permission set wholesale.
    ///
    /// The caller must hold ADMIN or PERMISSIONUPDATE. The target's set is
    /// replaced, not merged.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Forbidden` if the caller lacks permission.
    /// Returns `AuthError::UserNotFound` if the target doesn't exist.
    pub async fn update_permissions(
        &self,
        caller: &CurrentUser,
        target: UserId,
        permissions: &[Permission],
    ) -> Result<User, AuthError> {
        if !caller.has_any(&PERMISSION_UPDATE_PERMISSIONS) {
            return Err(AuthError::Forbidden);
        }

        self.users
            .update_permissions(target, permissions)
            .await?
            .ok_or(AuthError::UserNotFound)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
