//! Integration tests for the permission-update gate.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p velvet-mango-storefront)
//!
//! Run with: cargo test -p velvet-mango-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::json;

use velvet_mango_integration_tests::{base_url, client, signup, unique_email};

const PASSWORD: &str = "integration-password";

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_permission_update_replaces_set_wholesale() {
    let admin = client();
    signup(&admin, &unique_email("perm-admin"), PASSWORD).await;

    let target = signup(&client(), &unique_email("perm-target"), PASSWORD).await;
    let target_id = target["id"].as_i64().expect("user id");

    let resp = admin
        .post(format!("{}/users/{target_id}/permissions", base_url()))
        .json(&json!({ "permissions": ["USER", "ITEMCREATE"] }))
        .send()
        .await
        .expect("update permissions failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("permissions response");
    // Replaced, not merged: the signup-default ADMIN is gone
    assert_eq!(
        body["permissions"],
        serde_json::json!(["USER", "ITEMCREATE"])
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_downgraded_caller_cannot_update_permissions() {
    let admin = client();
    signup(&admin, &unique_email("perm-admin"), PASSWORD).await;

    let downgraded = client();
    let downgraded_user = signup(&downgraded, &unique_email("perm-downgraded"), PASSWORD).await;
    let downgraded_id = downgraded_user["id"].as_i64().expect("user id");

    let victim = signup(&client(), &unique_email("perm-victim"), PASSWORD).await;
    let victim_id = victim["id"].as_i64().expect("user id");

    // Strip ADMIN from the caller-to-be
    let resp = admin
        .post(format!("{}/users/{downgraded_id}/permissions", base_url()))
        .json(&json!({ "permissions": ["USER"] }))
        .send()
        .await
        .expect("update permissions failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // Without ADMIN or PERMISSIONUPDATE the gate closes
    let resp = downgraded
        .post(format!("{}/users/{victim_id}/permissions", base_url()))
        .json(&json!({ "permissions": ["USER"] }))
        .send()
        .await
        .expect("update permissions failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // And the target's permissions are unchanged: it can still perform an
    // ADMIN-gated operation itself.
    let victim_client = client();
    let resp = victim_client
        .post(format!("{}/auth/signin", base_url()))
        .json(&json!({
            "email": victim["email"].as_str().expect("email"),
            "password": PASSWORD,
        }))
        .send()
        .await
        .expect("signin failed");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = victim_client
        .post(format!("{}/users/{victim_id}/permissions", base_url()))
        .json(&json!({ "permissions": ["ADMIN"] }))
        .send()
        .await
        .expect("update permissions failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_permission_update_requires_authentication() {
    let resp = client()
        .post(format!("{}/users/1/permissions", base_url()))
        .json(&json!({ "permissions": ["USER"] }))
        .send()
        .await
        .expect("update permissions failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_unknown_permission_label_rejected() {
    let admin = client();
    signup(&admin, &unique_email("perm-labels"), PASSWORD).await;

    let resp = admin
        .post(format!("{}/users/1/permissions", base_url()))
        .json(&json!({ "permissions": ["SUPERADMIN"] }))
        .send()
        .await
        .expect("update permissions failed");
    // Serde rejects the unknown label at deserialization
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
