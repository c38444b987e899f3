//! Integration tests for Fornaccio.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply schema/catalog
//! cargo run -p fornaccio-cli -- migrate
//! cargo run -p fornaccio-cli -- seed
//!
//! # Start both servers
//! cargo run -p fornaccio-storefront &
//! cargo run -p fornaccio-admin &
//!
//! # Run integration tests
//! cargo test -p fornaccio-integration-tests -- --ignored
//! ```
//!
//! # Environment
//!
//! - `STOREFRONT_BASE_URL` (default `http://localhost:3000`)
//! - `ADMIN_BASE_URL` (default `http://localhost:3001`)
//! - `STAFF_PASSWORD` - plaintext matching the server's `ADMIN_PASSWORD_HASH`

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Staff password used to authenticate against the admin API.
#[must_use]
pub fn staff_password() -> String {
    std::env::var("STAFF_PASSWORD").unwrap_or_else(|_| "pizza-forno-rosso".to_string())
}

/// Create a cookie-holding HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// Create a client and log it in against the admin API.
///
/// # Panics
///
/// Panics if the login request fails or is rejected.
pub async fn staff_client() -> Client {
    let client = client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&serde_json::json!({ "password": staff_password() }))
        .send()
        .await
        .expect("Failed to reach admin login");

    assert!(
        resp.status().is_success(),
        "staff login rejected: {}",
        resp.status()
    );

    client
}
