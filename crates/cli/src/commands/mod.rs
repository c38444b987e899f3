//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Resolve the database URL for CLI commands.
///
/// Prefers `DATABASE_URL`; falls back to the storefront and admin variables
/// so the CLI works with whichever `.env` is around.
pub(crate) fn database_url() -> Result<SecretString, &'static str> {
    dotenvy::dotenv().ok();

    for key in ["DATABASE_URL", "STOREFRONT_DATABASE_URL", "ADMIN_DATABASE_URL"] {
        if let Ok(value) = std::env::var(key) {
            return Ok(SecretString::from(value));
        }
    }

    Err("DATABASE_URL not set")
}
