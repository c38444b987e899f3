//! Pizza catalog management.

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use fornaccio_core::{IngredientId, PizzaId};
use fornaccio_db::models::{NewPizza, Pizza, UpdatePizza};
use fornaccio_db::{CatalogRepository, RepositoryError};

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Pizza creation form.
#[derive(Debug, Deserialize)]
pub struct CreatePizzaRequest {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub default_ingredients: Vec<IngredientId>,
}

/// Pizza update form. The slug is immutable - it is referenced by menu links.
#[derive(Debug, Deserialize)]
pub struct UpdatePizzaRequest {
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub default_ingredients: Vec<IngredientId>,
    pub is_available: bool,
}

fn validate_price(price: Decimal) -> Result<(), AppError> {
    if price <= Decimal::ZERO {
        return Err(AppError::BadRequest("price must be positive".to_owned()));
    }
    Ok(())
}

/// `GET /api/pizzas` - the whole catalog, unavailable pizzas included.
#[instrument(skip(state))]
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<Pizza>>, AppError> {
    let catalog = CatalogRepository::new(state.pool());
    Ok(Json(catalog.list_pizzas(false).await?))
}

/// `POST /api/pizzas`
#[instrument(skip(state, request))]
pub async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CreatePizzaRequest>,
) -> Result<Json<Pizza>, AppError> {
    validate_price(request.base_price)?;
    if request.name.trim().is_empty() || request.slug.trim().is_empty() {
        return Err(AppError::BadRequest("name and slug are required".to_owned()));
    }

    let catalog = CatalogRepository::new(state.pool());
    let pizza = match catalog
        .create_pizza(&NewPizza {
            slug: request.slug.trim().to_owned(),
            name: request.name.trim().to_owned(),
            description: request.description,
            base_price: request.base_price,
            image: request.image,
            default_ingredients: request.default_ingredients,
        })
        .await
    {
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        other => other?,
    };

    Ok(Json(pizza))
}

/// `PUT /api/pizzas/{id}`
#[instrument(skip(state, request))]
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<PizzaId>,
    Json(request): Json<UpdatePizzaRequest>,
) -> Result<Json<Pizza>, AppError> {
    validate_price(request.base_price)?;

    let catalog = CatalogRepository::new(state.pool());
    let pizza = match catalog
        .update_pizza(
            id,
            &UpdatePizza {
                name: request.name.trim().to_owned(),
                description: request.description,
                base_price: request.base_price,
                image: request.image,
                default_ingredients: request.default_ingredients,
                is_available: request.is_available,
            },
        )
        .await
    {
        Err(RepositoryError::NotFound) => return Err(AppError::NotFound(format!("pizza {id}"))),
        other => other?,
    };

    Ok(Json(pizza))
}

/// `DELETE /api/pizzas/{id}` - order history keeps its snapshots.
#[instrument(skip(state))]
pub async fn delete(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<PizzaId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = CatalogRepository::new(state.pool());

    match catalog.delete_pizza(id).await {
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("pizza {id}"))),
        other => {
            other?;
            Ok(Json(serde_json::json!({ "deleted": true })))
        }
    }
}
