//! Fornaccio Core - Shared types library.
//!
//! This crate provides common types used across all Fornaccio components:
//! - `storefront` - Public ordering API (menu, checkout, tracking, payments)
//! - `admin` - Staff API (order board, catalog management, driver flow)
//! - `cli` - Command-line tools for migrations, seeding and management
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, phone numbers, order
//!   statuses, ingredient categories and modification snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
