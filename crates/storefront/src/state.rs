//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::payments::MollieClient;
use crate::routes::menu::{MenuCacheKey, MenuResponse};

/// How long a cached menu stays fresh. Catalog edits in the admin show up on
/// the storefront after at most this long.
const MENU_CACHE_TTL: Duration = Duration::from_secs(30);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    mollie: MollieClient,
    menu_cache: Cache<MenuCacheKey, Arc<MenuResponse>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment provider client fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, crate::payments::MollieError> {
        let mollie = MollieClient::new(&config.mollie)?;
        let menu_cache = Cache::builder()
            .time_to_live(MENU_CACHE_TTL)
            .max_capacity(8)
            .build();

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mollie,
                menu_cache,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn mollie(&self) -> &MollieClient {
        &self.inner.mollie
    }

    /// Get a reference to the menu response cache.
    #[must_use]
    pub fn menu_cache(&self) -> &Cache<MenuCacheKey, Arc<MenuResponse>> {
        &self.inner.menu_cache
    }
}
