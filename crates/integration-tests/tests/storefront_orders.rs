//! Integration tests for the public storefront flow: menu, checkout,
//! tracking.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p fornaccio-storefront)
//!
//! Run with: cargo test -p fornaccio-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use fornaccio_integration_tests::{client, storefront_base_url};

/// Fetch the menu and return the first available pizza id.
async fn first_pizza_id(client: &reqwest::Client) -> i64 {
    let base_url = storefront_base_url();
    let menu: Value = client
        .get(format!("{base_url}/api/menu"))
        .send()
        .await
        .expect("Failed to fetch menu")
        .json()
        .await
        .expect("Failed to parse menu");

    menu["pizzas"][0]["id"]
        .as_i64()
        .expect("menu has no pizzas - run `fornaccio-cli seed` first")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_menu_lists_pizzas_and_ingredients() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/menu"))
        .send()
        .await
        .expect("Failed to fetch menu");
    assert_eq!(resp.status(), StatusCode::OK);

    let menu: Value = resp.json().await.expect("Failed to parse menu");
    assert!(!menu["pizzas"].as_array().expect("pizzas array").is_empty());
    assert!(
        !menu["ingredients"]
            .as_array()
            .expect("ingredients array")
            .is_empty()
    );

    // Prices come back as decimal strings
    assert!(menu["pizzas"][0]["base_price"].is_string());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_creates_pending_order() {
    let client = client();
    let base_url = storefront_base_url();
    let pizza_id = first_pizza_id(&client).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "name": "Jean Dupont",
            "phone": "0470 12 34 56",
            "address": "Rue de la Station 12, 1200 Bruxelles",
            "instructions": "Sonnette du haut",
            "items": [{ "pizza_id": pizza_id, "quantity": 2 }]
        }))
        .send()
        .await
        .expect("Failed to submit order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse checkout response");
    let order_id = body["order_id"].as_i64().expect("order_id");
    assert_eq!(body["status"], "PENDING");

    // The public tracking view must show the snapshot
    let track: Value = client
        .get(format!("{base_url}/api/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("Failed to parse order");

    assert_eq!(track["status"], "PENDING");
    assert_eq!(track["customer_name"], "Jean Dupont");
    assert_eq!(track["items"].as_array().expect("items").len(), 1);
    assert_eq!(track["items"][0]["quantity"], 2);
    // Payment internals are not exposed publicly
    assert!(track.get("payment_id").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_rejects_invalid_phone() {
    let client = client();
    let base_url = storefront_base_url();
    let pizza_id = first_pizza_id(&client).await;

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "name": "Jean Dupont",
            "phone": "not-a-phone",
            "address": "Rue de la Station 12",
            "items": [{ "pizza_id": pizza_id }]
        }))
        .send()
        .await
        .expect("Failed to submit order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_rejects_empty_cart() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "name": "Jean Dupont",
            "phone": "0470123456",
            "address": "Rue de la Station 12",
            "items": []
        }))
        .send()
        .await
        .expect("Failed to submit order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_checkout_rejects_unknown_pizza() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "name": "Jean Dupont",
            "phone": "0470123456",
            "address": "Rue de la Station 12",
            "items": [{ "pizza_id": 999_999 }]
        }))
        .send()
        .await
        .expect("Failed to submit order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_track_unknown_order_is_404() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/orders/999999"))
        .send()
        .await
        .expect("Failed to fetch order");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
