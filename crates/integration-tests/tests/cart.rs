//! Integration tests for cart upsert consistency and owner scoping.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The storefront server running (cargo run -p velvet-mango-storefront)
//!
//! Run with: cargo test -p velvet-mango-integration-tests -- --ignored

use futures::future::join_all;
use reqwest::StatusCode;

use velvet_mango_integration_tests::{base_url, client, create_item, signup, unique_email};

const PASSWORD: &str = "integration-password";

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_to_cart_twice_merges_into_one_line() {
    let c = client();
    signup(&c, &unique_email("cart-merge"), PASSWORD).await;
    let item = create_item(&c, "Cart merge item").await;
    let item_id = item["id"].as_i64().expect("item id");

    let first: serde_json::Value = c
        .post(format!("{}/cart/{item_id}", base_url()))
        .send()
        .await
        .expect("add to cart failed")
        .json()
        .await
        .expect("cart response");
    assert_eq!(first["quantity"].as_i64(), Some(1));

    let second: serde_json::Value = c
        .post(format!("{}/cart/{item_id}", base_url()))
        .send()
        .await
        .expect("add to cart failed")
        .json()
        .await
        .expect("cart response");

    // Same line, incremented quantity - not a second row
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["quantity"].as_i64(), Some(2));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_concurrent_adds_lose_no_updates() {
    const CONCURRENCY: usize = 10;

    let c = client();
    signup(&c, &unique_email("cart-race"), PASSWORD).await;
    let item = create_item(&c, "Cart race item").await;
    let item_id = item["id"].as_i64().expect("item id");

    let requests = (0..CONCURRENCY).map(|_| {
        let c = c.clone();
        let url = format!("{}/cart/{item_id}", base_url());
        async move {
            let resp = c.post(url).send().await.expect("add to cart failed");
            assert_eq!(resp.status(), StatusCode::OK);
            resp.json::<serde_json::Value>()
                .await
                .expect("cart response")
        }
    });

    let responses = join_all(requests).await;

    let mut line_ids = std::collections::HashSet::new();
    let mut max_quantity = 0;
    for body in responses {
        line_ids.insert(body["id"].as_i64().expect("line id"));
        max_quantity = max_quantity.max(body["quantity"].as_i64().expect("quantity"));
    }

    // Exactly one cart line, with every add accounted for
    assert_eq!(line_ids.len(), 1);
    assert_eq!(max_quantity, CONCURRENCY as i64);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_unknown_item_is_not_found() {
    let c = client();
    signup(&c, &unique_email("cart-missing"), PASSWORD).await;

    let resp = c
        .post(format!("{}/cart/999999999", base_url()))
        .send()
        .await
        .expect("add to cart failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_add_to_cart_requires_authentication() {
    let resp = client()
        .post(format!("{}/cart/1", base_url()))
        .send()
        .await
        .expect("add to cart failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_remove_by_non_owner_is_forbidden_and_line_survives() {
    // Owner puts an item in their cart
    let owner = client();
    signup(&owner, &unique_email("cart-owner"), PASSWORD).await;
    let item = create_item(&owner, "Owner's item").await;
    let item_id = item["id"].as_i64().expect("item id");

    let line: serde_json::Value = owner
        .post(format!("{}/cart/{item_id}", base_url()))
        .send()
        .await
        .expect("add to cart failed")
        .json()
        .await
        .expect("cart response");
    let line_id = line["id"].as_i64().expect("line id");

    // A different user tries to remove it
    let intruder = client();
    signup(&intruder, &unique_email("cart-intruder"), PASSWORD).await;
    let resp = intruder
        .delete(format!("{}/cart/{line_id}", base_url()))
        .send()
        .await
        .expect("remove failed");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The line is untouched: the owner can still remove it
    let resp = owner
        .delete(format!("{}/cart/{line_id}", base_url()))
        .send()
        .await
        .expect("remove failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // And it is gone afterwards
    let resp = owner
        .delete(format!("{}/cart/{line_id}", base_url()))
        .send()
        .await
        .expect("remove failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
