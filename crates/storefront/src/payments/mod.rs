//! Mollie payment API client.
//!
//! The storefront never touches card data: it creates a hosted payment
//! session, sends the customer to the provider's checkout URL, and learns the
//! outcome by webhook or by re-fetching the payment.
//!
//! # API Reference
//!
//! - Base URL: `https://api.mollie.com/v2`
//! - Authentication: `Authorization: Bearer <api key>`

mod types;

pub use types::*;

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::MollieConfig;

/// Mollie API base URL.
const BASE_URL: &str = "https://api.mollie.com/v2";

/// Errors that can occur when interacting with the Mollie API.
#[derive(Debug, Error)]
pub enum MollieError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Payment not found.
    #[error("Payment not found: {0}")]
    NotFound(String),

    /// Unauthorized (invalid API key).
    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    /// Failed to build or parse a request/response.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Mollie API client.
#[derive(Clone)]
pub struct MollieClient {
    inner: Arc<MollieClientInner>,
}

struct MollieClientInner {
    client: reqwest::Client,
}

impl MollieClient {
    /// Create a new Mollie API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &MollieConfig) -> Result<Self, MollieError> {
        let mut headers = HeaderMap::new();

        let auth_value = format!("Bearer {}", config.api_key.expose_secret());
        let mut auth_header = HeaderValue::from_str(&auth_value)
            .map_err(|e| MollieError::Parse(format!("Invalid API key format: {e}")))?;
        auth_header.set_sensitive(true);
        headers.insert("Authorization", auth_header);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(MollieClientInner { client }),
        })
    }

    /// Create a hosted payment session.
    ///
    /// # Errors
    ///
    /// Returns `MollieError` if the request fails or the API rejects it.
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
    ) -> Result<Payment, MollieError> {
        let url = format!("{BASE_URL}/payments");
        let response = self.inner.client.post(&url).json(request).send().await?;
        Self::handle_response(response).await
    }

    /// Fetch a payment by its provider id (`tr_…`).
    ///
    /// # Errors
    ///
    /// Returns `MollieError::NotFound` for unknown ids, other `MollieError`
    /// variants for transport or API failures.
    pub async fn get_payment(&self, payment_id: &str) -> Result<Payment, MollieError> {
        let url = format!("{BASE_URL}/payments/{payment_id}");
        let response = self.inner.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MollieError::NotFound(payment_id.to_owned()));
        }

        Self::handle_response(response).await
    }

    /// Map a provider response to a typed payment or an error.
    async fn handle_response(response: reqwest::Response) -> Result<Payment, MollieError> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(MollieError::Unauthorized);
        }

        if !status.is_success() {
            let message = response
                .json::<serde_json::Value>()
                .await
                .ok()
                .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_owned))
                .unwrap_or_else(|| "unknown error".to_owned());

            return Err(MollieError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let payment = response.json::<Payment>().await?;
        Ok(payment)
    }
}
