//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! fornaccio-cli migrate
//! ```
//!
//! Applies the embedded migrations from `crates/db/migrations/` to the
//! shared database.

use tracing::info;

/// Run database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails,
/// or a migration fails to apply.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    info!("Connecting to database...");
    let pool = fornaccio_db::create_pool(&database_url).await?;

    info!("Running migrations...");
    fornaccio_db::migrator().run(&pool).await?;

    info!("Migrations complete!");
    Ok(())
}
