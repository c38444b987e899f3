//! Driver view: active deliveries and manual location posting.
//!
//! The driver's phone either runs a GPS beacon app (handled by the public
//! tracking endpoint) or posts its position here explicitly from the driver
//! page while a delivery is open.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fornaccio_core::{OrderId, OrderStatus};
use fornaccio_db::models::OrderWithItems;
use fornaccio_db::{OrderRepository, RepositoryError};

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Active deliveries for the driver list.
#[derive(Debug, Serialize)]
pub struct DriverOrdersResponse {
    pub orders: Vec<OrderWithItems>,
}

/// A manual position report.
#[derive(Debug, Deserialize)]
pub struct LocationRequest {
    pub lat: f64,
    pub lng: f64,
}

/// `GET /api/driver/orders` - orders in the active-delivery set, newest
/// first.
#[instrument(skip(state))]
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<DriverOrdersResponse>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let active = orders
        .list_by_statuses(&OrderStatus::ACTIVE_DELIVERY)
        .await?;

    Ok(Json(DriverOrdersResponse { orders: active }))
}

/// `POST /api/driver/orders/{id}/location` - attach the driver's position to
/// one order.
#[instrument(skip(state))]
pub async fn post_location(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<LocationRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !(-90.0..=90.0).contains(&request.lat) || !(-180.0..=180.0).contains(&request.lng) {
        return Err(AppError::BadRequest("coordinates out of range".to_owned()));
    }

    let orders = OrderRepository::new(state.pool());
    match orders.set_driver_location(id, request.lat, request.lng).await {
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("order {id}"))),
        other => {
            other?;
            Ok(Json(serde_json::json!({ "updated": true })))
        }
    }
}
