//! Session-facing domain types for the admin API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session keys used by the admin API.
pub mod session_keys {
    /// Key under which the logged-in staff principal is stored.
    pub const CURRENT_STAFF: &str = "current_staff";
}

/// The logged-in staff principal stored in the session.
///
/// The shop runs on a single shared staff password, so there is no per-user
/// identity to carry - just proof of login and when it happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentStaff {
    /// When this session was established.
    pub logged_in_at: DateTime<Utc>,
}
