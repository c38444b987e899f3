//! Route definitions for the storefront.

pub mod menu;
pub mod orders;
pub mod payments;
pub mod tracking;
pub mod webhooks;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware::rate_limit::checkout_rate_limiter;
use crate::state::AppState;

/// Build the storefront router.
///
/// Checkout and payment endpoints carry a per-IP rate limit; the menu, the
/// tracking poll, the provider webhook and the GPS beacon endpoint do not
/// (beacons fire every few seconds by design).
pub fn routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/api/orders", post(orders::create))
        .route("/api/orders/{id}/payment", post(payments::create))
        .route("/api/orders/{id}/payment/validate", post(payments::validate))
        .layer(checkout_rate_limiter());

    Router::new()
        .route("/api/menu", get(menu::show))
        .route("/api/orders/{id}", get(orders::track))
        .route("/api/webhooks/mollie", post(webhooks::mollie))
        .route(
            "/api/tracking/traccar",
            get(tracking::ingest).post(tracking::ingest),
        )
        .merge(limited)
}
