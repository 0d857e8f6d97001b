//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                  - Liveness check
//! GET    /health/ready            - Readiness check (database ping)
//!
//! # Auth
//! POST   /auth/signup             - Create account, set session cookie
//! POST   /auth/signin             - Login, set session cookie
//! POST   /auth/signout            - Clear session cookie
//! POST   /auth/request-reset      - Email a password-reset link
//! POST   /auth/reset-password     - Redeem a reset token, set session cookie
//!
//! # Items
//! POST   /items                   - List a new item (requires auth)
//! PUT    /items/{id}              - Update an item
//! DELETE /items/{id}              - Delete an item (owner or ADMIN/ITEMDELETE)
//!
//! # Cart (requires auth)
//! POST   /cart/{id}               - Add item {id} to the caller's cart
//! DELETE /cart/{id}               - Remove cart line {id}
//!
//! # Users
//! POST   /users/{id}/permissions  - Replace a user's permission set
//!                                   (requires ADMIN or PERMISSIONUPDATE)
//! ```

pub mod auth;
pub mod cart;
pub mod items;
pub mod users;

use axum::{
    Router,
    routing::{post, put},
};

use crate::state::AppState;

/// Create the storefront API router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(auth::signup))
        .route("/auth/signin", post(auth::signin))
        .route("/auth/signout", post(auth::signout))
        .route("/auth/request-reset", post(auth::request_reset))
        .route("/auth/reset-password", post(auth::reset_password))
        .route("/items", post(items::create_item))
        .route(
            "/items/{id}",
            put(items::update_item).delete(items::delete_item),
        )
        .route(
            "/cart/{id}",
            post(cart::add_to_cart).delete(cart::remove_from_cart),
        )
        .route("/users/{id}/permissions", post(users::update_permissions))
}
