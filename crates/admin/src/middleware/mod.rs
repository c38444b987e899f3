//! Middleware for the admin API.

pub mod auth;
pub mod rate_limit;
pub mod session;

pub use auth::RequireStaff;
pub use session::create_session_layer;
