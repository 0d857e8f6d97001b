//! Authentication route handlers.
//!
//! Handles signup, signin, signout, and the password-reset flow. Handlers
//! that establish a session hand the signed token to the client as an
//! `httpOnly` cookie with a one-year lifetime.

use axum::{
    Json,
    extract::State,
    http::header::SET_COOKIE,
    response::{AppendHeaders, IntoResponse},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use velvet_mango_core::{Email, Permission, UserId};

use crate::error::AppError;
use crate::models::user::User;
use crate::services::auth::AuthService;
use crate::services::token::{clear_session_cookie_header, session_cookie_header};
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Signin request body.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Password reset request body.
#[derive(Debug, Deserialize)]
pub struct RequestResetRequest {
    pub email: String,
}

/// Reset redemption request body.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub reset_token: String,
    pub password: String,
    pub confirm_password: String,
}

// =============================================================================
// Response Types
// =============================================================================

/// User payload returned by auth and permission mutations.
///
/// Never includes the password hash or reset-token fields.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            permissions: user.permissions,
        }
    }
}

/// Simple acknowledgement payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the response for a freshly authenticated user: session cookie
/// plus the user payload.
fn signed_in(state: &AppState, user: User) -> impl IntoResponse + use<> {
    let token = state.tokens().issue(user.id);
    (
        AppendHeaders([(SET_COOKIE, session_cookie_header(&token))]),
        Json(UserResponse::from(user)),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new account and sign the caller in.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(state.pool())
        .signup(&req.email, &req.password, &req.name)
        .await?;

    tracing::info!(user_id = %user.id, "New signup");
    Ok(signed_in(&state, user))
}

/// Sign in with email and password.
pub async fn signin(
    State(state): State<AppState>,
    Json(req): Json<SigninRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(state.pool())
        .signin(&req.email, &req.password)
        .await?;

    Ok(signed_in(&state, user))
}

/// Sign out by clearing the session cookie.
///
/// Tokens are stateless, so there is no server-side session to purge; a
/// copy of the token kept elsewhere remains valid.
pub async fn signout() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, clear_session_cookie_header())]),
        Json(MessageResponse {
            message: "Goodbye!".to_string(),
        }),
    )
}

/// Request a password-reset email.
///
/// The token is persisted before the email goes out; a delivery failure
/// is logged and reported in the acknowledgement without rolling the
/// token back.
pub async fn request_reset(
    State(state): State<AppState>,
    Json(req): Json<RequestResetRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let (user, token) = AuthService::new(state.pool())
        .request_reset(&req.email, Utc::now())
        .await?;

    let reset_url = format!(
        "{}/reset?resetToken={}",
        state.config().frontend_url,
        token.token
    );

    let message = match state
        .email()
        .send_password_reset(user.email.as_str(), &reset_url)
        .await
    {
        Ok(()) => "Reset token sent to your email".to_string(),
        Err(e) => {
            tracing::warn!(user_id = %user.id, error = %e, "Reset email delivery failed");
            "Reset token saved, but the email could not be delivered".to_string()
        }
    };

    Ok(Json(MessageResponse { message }))
}

/// Redeem a reset token, store the new password, and sign the caller in.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = AuthService::new(state.pool())
        .reset_password(
            &req.reset_token,
            &req.password,
            &req.confirm_password,
            Utc::now(),
        )
        .await?;

    tracing::info!(user_id = %user.id, "Password reset completed");
    Ok(signed_in(&state, user))
}
