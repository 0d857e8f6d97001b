//! Integration tests for Velvet Mango.
//!
//! # Running Tests
//!
//! These tests drive a running storefront over HTTP and need direct
//! database access to read reset tokens:
//!
//! ```bash
//! # Run migrations and start the server
//! cargo run -p velvet-mango-cli -- migrate
//! cargo run -p velvet-mango-storefront
//!
//! # Run integration tests
//! cargo test -p velvet-mango-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Server under test (default: `http://localhost:3000`)
//! - `STOREFRONT_DATABASE_URL` - Database of the server under test

use reqwest::Client;
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so the session cookie set by
/// signup/signin rides along on subsequent requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Generate a unique test email address.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@integration.test", Uuid::new_v4().simple())
}

/// Sign up a fresh user through the API; the client keeps the session
/// cookie. Returns the user payload.
///
/// # Panics
///
/// Panics if the request fails or the response is not a success.
pub async fn signup(client: &Client, email: &str, password: &str) -> Value {
    let resp = client
        .post(format!("{}/auth/signup", base_url()))
        .json(&json!({
            "email": email,
            "password": password,
            "name": "Integration Test",
        }))
        .send()
        .await
        .expect("signup request failed");

    assert!(
        resp.status().is_success(),
        "signup failed with {}",
        resp.status()
    );
    resp.json().await.expect("signup response was not JSON")
}

/// Create an item through the API and return its payload.
///
/// # Panics
///
/// Panics if the request fails or the response is not a success.
pub async fn create_item(client: &Client, title: &str) -> Value {
    let resp = client
        .post(format!("{}/items", base_url()))
        .json(&json!({
            "title": title,
            "description": "An item created by the integration tests",
            "price": 4200,
        }))
        .send()
        .await
        .expect("create item request failed");

    assert!(
        resp.status().is_success(),
        "create item failed with {}",
        resp.status()
    );
    resp.json().await.expect("item response was not JSON")
}

/// Connect to the database of the server under test.
///
/// # Panics
///
/// Panics if `STOREFRONT_DATABASE_URL` is unset or the connection fails.
pub async fn db_pool() -> sqlx::PgPool {
    let url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STOREFRONT_DATABASE_URL must be set for integration tests");
    sqlx::PgPool::connect(&url)
        .await
        .expect("Failed to connect to test database")
}
