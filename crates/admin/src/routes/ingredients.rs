//! Ingredient catalog management.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use fornaccio_core::{IngredientCategory, IngredientId};
use fornaccio_db::models::{Ingredient, NewIngredient, UpdateIngredient};
use fornaccio_db::{CatalogRepository, RepositoryError};

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Ingredient creation form.
#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    pub slug: String,
    pub price: Decimal,
    pub category: IngredientCategory,
}

/// Ingredient update form.
#[derive(Debug, Deserialize)]
pub struct UpdateIngredientRequest {
    pub name: String,
    pub price: Decimal,
    pub category: IngredientCategory,
    pub is_available: bool,
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    // Base sauces are included in the pizza price, so zero is valid here
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("price cannot be negative".to_owned()));
    }
    Ok(())
}

/// `GET /api/ingredients` - everything, grouped by category.
#[instrument(skip(state))]
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let catalog = CatalogRepository::new(state.pool());
    Ok(Json(catalog.list_ingredients(false).await?))
}

/// `POST /api/ingredients`
#[instrument(skip(state, request))]
pub async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreateIngredientRequest>,
) -> Result<Json<Ingredient>, AppError> {
    validate_price(request.price)?;
    if request.name.trim().is_empty() || request.slug.trim().is_empty() {
        return Err(AppError::BadRequest("name and slug are required".to_owned()));
    }

    let catalog = CatalogRepository::new(state.pool());
    let ingredient = match catalog
        .create_ingredient(&NewIngredient {
            slug: request.slug.trim().to_owned(),
            name: request.name.trim().to_owned(),
            price: request.price,
            category: request.category,
        })
        .await
    {
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        other => other?,
    };

    Ok(Json(ingredient))
}

/// `PUT /api/ingredients/{id}`
#[instrument(skip(state, request))]
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<IngredientId>,
    Json(request): Json<UpdateIngredientRequest>,
) -> Result<Json<Ingredient>, AppError> {
    validate_price(request.price)?;

    let catalog = CatalogRepository::new(state.pool());
    let ingredient = match catalog
        .update_ingredient(
            id,
            &UpdateIngredient {
                name: request.name.trim().to_owned(),
                price: request.price,
                category: request.category,
                is_available: request.is_available,
            },
        )
        .await
    {
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("ingredient {id}")));
        }
        other => other?,
    };

    Ok(Json(ingredient))
}

/// `DELETE /api/ingredients/{id}` - modification snapshots keep the id.
#[instrument(skip(state))]
pub async fn delete(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<IngredientId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = CatalogRepository::new(state.pool());

    match catalog.delete_ingredient(id).await {
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("ingredient {id}"))),
        other => {
            other?;
            Ok(Json(serde_json::json!({ "deleted": true })))
        }
    }
}
