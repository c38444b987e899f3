//! Integration tests for the staff flow: login, board, manual orders,
//! status transitions.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The admin server running (cargo run -p fornaccio-admin)
//! - `STAFF_PASSWORD` matching the server's `ADMIN_PASSWORD_HASH`
//!
//! Run with: cargo test -p fornaccio-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use fornaccio_integration_tests::{admin_base_url, client, staff_client};

/// Create a manual takeaway order and return its id.
async fn create_manual_order(client: &reqwest::Client) -> i64 {
    let base_url = admin_base_url();

    let pizzas: Value = client
        .get(format!("{base_url}/api/pizzas"))
        .send()
        .await
        .expect("Failed to list pizzas")
        .json()
        .await
        .expect("Failed to parse pizzas");
    let pizza_id = pizzas[0]["id"]
        .as_i64()
        .expect("catalog is empty - run `fornaccio-cli seed` first");

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "customer_name": "Marco Rossi",
            "first_name": "Marco",
            "last_name": "Rossi",
            "phone": "0471 22 33 44",
            "address": "Avenue Louise 1, 1050 Bruxelles",
            "order_type": "takeaway",
            "items": [{ "pizza_id": pizza_id, "quantity": 1 }]
        }))
        .send()
        .await
        .expect("Failed to create manual order");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to parse order");
    body["id"].as_i64().expect("order id")
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_unauthenticated_requests_are_rejected() {
    let client = client();
    let base_url = admin_base_url();

    for path in ["/api/board", "/api/customers", "/api/stats", "/api/driver/orders"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to reach admin");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "path {path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_login_with_wrong_password_fails() {
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "password": "definitely-wrong" }))
        .send()
        .await
        .expect("Failed to reach login");

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_board_has_three_columns() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let board: Value = client
        .get(format!("{base_url}/api/board"))
        .send()
        .await
        .expect("Failed to fetch board")
        .json()
        .await
        .expect("Failed to parse board");

    let columns = board["columns"].as_array().expect("columns");
    let keys: Vec<&str> = columns
        .iter()
        .map(|c| c["key"].as_str().expect("key"))
        .collect();
    assert_eq!(keys, vec!["NEW", "PREPARING", "READY"]);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_manual_order_lifecycle() {
    let client = staff_client().await;
    let base_url = admin_base_url();
    let order_id = create_manual_order(&client).await;

    // A fresh manual order sits in the NEW column as PENDING
    let order: Value = client
        .get(format!("{base_url}/api/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("Failed to parse order");
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["instructions"], "A Emporter");

    // Walk it through the kitchen
    for status in ["PREPARING", "READY", "DELIVERED"] {
        let resp = client
            .put(format!("{base_url}/api/orders/{order_id}/status"))
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to update status");
        assert_eq!(resp.status(), StatusCode::OK, "moving to {status}");
    }

    // Terminal orders do not move backwards
    let resp = client
        .put(format!("{base_url}/api/orders/{order_id}/status"))
        .json(&json!({ "status": "PREPARING" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_status_synonyms_are_normalized() {
    let client = staff_client().await;
    let base_url = admin_base_url();
    let order_id = create_manual_order(&client).await;

    client
        .put(format!("{base_url}/api/orders/{order_id}/status"))
        .json(&json!({ "status": "PREPARING" }))
        .send()
        .await
        .expect("Failed to update status");

    // The legacy synonym is accepted and stored canonically
    let resp = client
        .put(format!("{base_url}/api/orders/{order_id}/status"))
        .json(&json!({ "status": "LIVRAISON" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::OK);

    let order: Value = resp.json().await.expect("Failed to parse order");
    assert_eq!(order["status"], "DELIVERING");
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_manual_order_requires_address() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/api/orders"))
        .json(&json!({
            "customer_name": "Marco Rossi",
            "first_name": "Marco",
            "last_name": "Rossi",
            "phone": "0471 22 33 44",
            "order_type": "takeaway",
            "items": [{ "pizza_id": 1 }]
        }))
        .send()
        .await
        .expect("Failed to create order");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_customer_upserted_by_normalized_phone() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    // Two orders with the same phone in different formats
    create_manual_order(&client).await;
    create_manual_order(&client).await;

    let found: Value = client
        .get(format!("{base_url}/api/customers/search?q=Rossi"))
        .send()
        .await
        .expect("Failed to search")
        .json()
        .await
        .expect("Failed to parse search");

    let matching: Vec<&Value> = found
        .as_array()
        .expect("array")
        .iter()
        .filter(|c| c["phone"] == "+32471223344")
        .collect();
    assert_eq!(matching.len(), 1, "one customer record per phone");
}

#[tokio::test]
#[ignore = "Requires running admin server and seeded database"]
async fn test_stats_shape() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let stats: Value = client
        .get(format!("{base_url}/api/stats"))
        .send()
        .await
        .expect("Failed to fetch stats")
        .json()
        .await
        .expect("Failed to parse stats");

    assert!(stats["daily_revenue"].is_string());
    assert!(stats["total_orders"].is_i64() || stats["total_orders"].is_u64());
    assert!(stats["best_sellers"].as_array().expect("best_sellers").len() <= 5);
}
