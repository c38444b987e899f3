//! Core types for Fornaccio.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod modifications;
pub mod phone;
pub mod status;

pub use category::*;
pub use id::*;
pub use modifications::*;
pub use phone::*;
pub use status::*;
