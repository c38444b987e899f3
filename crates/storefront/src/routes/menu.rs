//! Menu route handler.
//!
//! The menu is the hottest read on the storefront and changes rarely, so the
//! database response is held in a short-TTL moka cache.

use std::sync::Arc;

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use fornaccio_db::CatalogRepository;
use fornaccio_db::models::{Ingredient, Pizza};

use crate::error::AppError;
use crate::state::AppState;

/// Cache key for menu responses.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum MenuCacheKey {
    Menu,
}

/// The public menu: available pizzas plus the ingredients offered for
/// customization.
#[derive(Debug, Clone, Serialize)]
pub struct MenuResponse {
    pub pizzas: Vec<Pizza>,
    pub ingredients: Vec<Ingredient>,
}

/// `GET /api/menu`
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Result<Json<MenuResponse>, AppError> {
    let menu = state
        .menu_cache()
        .try_get_with(MenuCacheKey::Menu, load_menu(state.clone()))
        .await
        .map_err(|e: Arc<AppError>| AppError::Internal(e.to_string()))?;

    Ok(Json(menu.as_ref().clone()))
}

/// Load the menu from the database (cache miss path).
async fn load_menu(state: AppState) -> Result<Arc<MenuResponse>, AppError> {
    let catalog = CatalogRepository::new(state.pool());
    let pizzas = catalog.list_pizzas(true).await?;
    let ingredients = catalog.list_ingredients(true).await?;

    Ok(Arc::new(MenuResponse {
        pizzas,
        ingredients,
    }))
}
