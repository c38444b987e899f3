//! Integration tests for GPS beacon ingestion and the driver flow.
//!
//! These tests require both servers running against a seeded database.
//!
//! Run with: cargo test -p fornaccio-integration-tests -- --ignored

use reqwest::StatusCode;
use serde_json::{Value, json};

use fornaccio_integration_tests::{admin_base_url, client, staff_client, storefront_base_url};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_beacon_rejects_missing_params() {
    let client = client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/api/tracking/traccar?id=phone-1"))
        .send()
        .await
        .expect("Failed to reach beacon endpoint");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Zero coordinates are a tracker cold-start artifact, also rejected
    let resp = client
        .get(format!(
            "{base_url}/api/tracking/traccar?id=phone-1&lat=0&lon=0"
        ))
        .send()
        .await
        .expect("Failed to reach beacon endpoint");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_beacon_accepts_position_get_and_post() {
    let client = client();
    let base_url = storefront_base_url();
    let url =
        format!("{base_url}/api/tracking/traccar?id=phone-1&lat=50.8466&lon=4.3528");

    let resp = client.get(&url).send().await.expect("GET failed");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.expect("body"), "OK");

    // Trackers sometimes POST with the same query params
    let resp = client.post(&url).send().await.expect("POST failed");
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
#[ignore = "Requires running storefront and admin servers with seeded database"]
async fn test_beacon_position_reaches_active_order() {
    let staff = staff_client().await;
    let admin_url = admin_base_url();
    let store_url = storefront_base_url();

    // Create an order and move it into the active-delivery set
    let pizzas: Value = staff
        .get(format!("{admin_url}/api/pizzas"))
        .send()
        .await
        .expect("Failed to list pizzas")
        .json()
        .await
        .expect("Failed to parse pizzas");
    let pizza_id = pizzas[0]["id"].as_i64().expect("pizza id");

    let order: Value = staff
        .post(format!("{admin_url}/api/orders"))
        .json(&json!({
            "customer_name": "Lucie Petit",
            "first_name": "Lucie",
            "last_name": "Petit",
            "phone": "0476 98 76 54",
            "address": "Chaussée de Wavre 100, 1040 Bruxelles",
            "order_type": "delivery",
            "items": [{ "pizza_id": pizza_id }]
        }))
        .send()
        .await
        .expect("Failed to create order")
        .json()
        .await
        .expect("Failed to parse order");
    let order_id = order["id"].as_i64().expect("order id");

    staff
        .put(format!("{admin_url}/api/orders/{order_id}/status"))
        .json(&json!({ "status": "DELIVERING" }))
        .send()
        .await
        .expect("Failed to update status");

    // Beacon fires on the public endpoint
    let beacon = client();
    let resp = beacon
        .get(format!(
            "{store_url}/api/tracking/traccar?id=phone-1&lat=50.8466&lon=4.3528"
        ))
        .send()
        .await
        .expect("Beacon failed");
    assert_eq!(resp.status(), StatusCode::OK);

    // The public tracking view now carries the coordinates
    let track: Value = beacon
        .get(format!("{store_url}/api/orders/{order_id}"))
        .send()
        .await
        .expect("Failed to fetch order")
        .json()
        .await
        .expect("Failed to parse order");

    assert!((track["driver_lat"].as_f64().expect("lat") - 50.8466).abs() < 1e-9);
    assert!((track["driver_lng"].as_f64().expect("lng") - 4.3528).abs() < 1e-9);

    // And the driver list shows the order
    let deliveries: Value = staff
        .get(format!("{admin_url}/api/driver/orders"))
        .send()
        .await
        .expect("Failed to fetch driver orders")
        .json()
        .await
        .expect("Failed to parse driver orders");

    let ids: Vec<i64> = deliveries["orders"]
        .as_array()
        .expect("orders")
        .iter()
        .map(|o| o["id"].as_i64().expect("id"))
        .collect();
    assert!(ids.contains(&order_id));
}

#[tokio::test]
#[ignore = "Requires running admin server with seeded database"]
async fn test_manual_location_post_validates_range() {
    let staff = staff_client().await;
    let admin_url = admin_base_url();

    let resp = staff
        .post(format!("{admin_url}/api/driver/orders/1/location"))
        .json(&json!({ "lat": 200.0, "lng": 4.35 }))
        .send()
        .await
        .expect("Failed to post location");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
