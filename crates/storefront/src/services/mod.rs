//! Background and shared services for the storefront.

pub mod payment_sync;
