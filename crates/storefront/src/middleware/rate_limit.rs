//! Rate limiting middleware using governor and `tower_governor`.
//!
//! The storefront faces the open internet; checkout and payment endpoints
//! get a per-IP budget so a misbehaving client cannot flood the kitchen with
//! orders or hammer the payment provider.

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor};

/// Rate limiter layer type for Axum.
///
/// `SmartIpKeyExtractor` reads the usual proxy headers (x-forwarded-for,
/// x-real-ip, forwarded) before falling back to the peer address, so limits
/// key on the real client IP behind the reverse proxy.
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for checkout/payment endpoints: ~20 requests per
/// minute per IP, burst of 10.
///
/// A legitimate customer places one order and then polls payment validation
/// a handful of times; this budget is generous for that and hostile to
/// scripted order spam.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers, which are always accepted by `GovernorConfigBuilder`.
#[must_use]
pub fn checkout_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(3) // Replenish 1 token every 3 seconds (~20/minute)
        .burst_size(10)
        .finish()
        .expect("rate limiter config with per_second(3) and burst_size(10) is valid");
    GovernorLayer::new(Arc::new(config))
}
