//! User administration route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;

use velvet_mango_core::{Permission, UserId};

use super::auth::UserResponse;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Update-permissions request body.
#[derive(Debug, Deserialize)]
pub struct UpdatePermissionsRequest {
    /// The full new permission set; replaces the target's set wholesale.
    pub permissions: Vec<Permission>,
}

/// Replace a user's permission set.
///
/// Requires the caller to hold ADMIN or PERMISSIONUPDATE.
pub async fn update_permissions(
    RequireAuth(caller): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(req): Json<UpdatePermissionsRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = AuthService::new(state.pool())
        .update_permissions(&caller, UserId::new(id), &req.permissions)
        .await?;

    Ok(Json(user.into()))
}
