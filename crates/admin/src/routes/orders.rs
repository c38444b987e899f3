//! Manual order entry, editing and status transitions.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::instrument;

use fornaccio_core::{Modifications, OrderId, OrderStatus, Phone, PizzaId};
use fornaccio_db::models::{NewOrderItem, Order, OrderSnapshot, OrderWithItems};
use fornaccio_db::{CatalogRepository, CustomerRepository, OrderRepository};

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

// =============================================================================
// Request Types
// =============================================================================

/// Whether the order leaves with a driver or over the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    Takeaway,
    Delivery,
}

impl OrderType {
    /// The instruction line the kitchen ticket shows for this order type.
    const fn instructions(self) -> &'static str {
        match self {
            Self::Delivery => "⚠️ LIVRAISON",
            Self::Takeaway => "A Emporter",
        }
    }
}

/// Manual order form, used by phone-order entry in the admin.
#[derive(Debug, Deserialize)]
pub struct ManualOrderRequest {
    pub customer_name: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    pub items: Vec<ManualOrderItem>,
    pub order_type: OrderType,
}

/// One line of a manual order.
#[derive(Debug, Deserialize)]
pub struct ManualOrderItem {
    pub pizza_id: PizzaId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub modifications: Option<Modifications>,
}

const fn default_quantity() -> u32 {
    1
}

/// Status transition request.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

// =============================================================================
// Handlers
// =============================================================================

/// `GET /api/orders/{id}` - full order details for the staff view.
#[instrument(skip(state))]
pub async fn get(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<OrderWithItems>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(order))
}

/// `PUT /api/orders/{id}/status` - move an order along its lifecycle.
///
/// Illegal transitions (backwards moves, cancelling an order already in the
/// oven) are rejected with 409.
#[instrument(skip(state))]
pub async fn update_status(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<Order>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.can_transition_to(request.status) {
        return Err(AppError::Conflict(format!(
            "cannot move order from {} to {}",
            order.status, request.status
        )));
    }

    let updated = orders.set_status(id, request.status).await?;
    tracing::info!(order_id = %id, from = %order.status, to = %updated.status, "Order status updated");

    Ok(Json(updated))
}

/// `POST /api/orders` - manual order entry (phone orders).
#[instrument(skip(state, request))]
pub async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<ManualOrderRequest>,
) -> Result<Json<OrderWithItems>, AppError> {
    let (snapshot, items, total) = build_manual_order(&state, &request).await?;

    let orders = OrderRepository::new(state.pool());
    let created = orders.create(&snapshot, total, &items).await?;

    tracing::info!(order_id = %created.order.id, %total, "Manual order created");
    Ok(Json(created))
}

/// `PUT /api/orders/{id}` - manual order edit.
///
/// Replaces the customer snapshot and every line item atomically.
#[instrument(skip(state, request))]
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
    Json(request): Json<ManualOrderRequest>,
) -> Result<Json<OrderWithItems>, AppError> {
    let (snapshot, items, total) = build_manual_order(&state, &request).await?;

    let orders = OrderRepository::new(state.pool());
    let updated = match orders.replace(id, &snapshot, total, &items).await {
        Err(fornaccio_db::RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("order {id}")));
        }
        other => other?,
    };

    tracing::info!(order_id = %id, %total, "Manual order updated");
    Ok(Json(updated))
}

// =============================================================================
// Shared Construction
// =============================================================================

/// Validate a manual order form and turn it into a snapshot + priced items.
///
/// Manual orders are priced from the pizza base price only (extras are
/// negotiated over the phone and folded into the kitchen ticket, not the
/// bill). Unknown pizzas are skipped; an order with no valid line left is
/// rejected. The address is required even for takeaway so the customer file
/// stays deduplicated.
async fn build_manual_order(
    state: &AppState,
    request: &ManualOrderRequest,
) -> Result<(OrderSnapshot, Vec<NewOrderItem>, Decimal), AppError> {
    let address = request
        .address
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| {
            AppError::BadRequest(
                "address is required (even for takeaway) for the customer file".to_owned(),
            )
        })?;

    let phone = Phone::parse(&request.phone)
        .map_err(|e| AppError::BadRequest(format!("invalid phone number: {e}")))?;

    let catalog = CatalogRepository::new(state.pool());
    let pizza_ids: Vec<PizzaId> = request.items.iter().map(|i| i.pizza_id).collect();
    let pizzas: HashMap<PizzaId, _> = catalog
        .get_pizzas_by_ids(&pizza_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut items = Vec::with_capacity(request.items.len());
    let mut total = Decimal::ZERO;

    for item in &request.items {
        // Stale catalog references from an open modal are skipped, not fatal
        let Some(pizza) = pizzas.get(&item.pizza_id) else {
            continue;
        };
        if item.quantity == 0 {
            continue;
        }

        let line_total = pizza.base_price * Decimal::from(item.quantity);
        total += line_total;

        items.push(NewOrderItem {
            pizza_name: pizza.name.clone(),
            base_price: pizza.base_price,
            final_price: line_total,
            quantity: i32::try_from(item.quantity).unwrap_or(1),
            modifications: item.modifications.clone().unwrap_or_default(),
        });
    }

    if items.is_empty() {
        return Err(AppError::BadRequest("no valid pizzas in order".to_owned()));
    }

    let customers = CustomerRepository::new(state.pool());
    let customer = customers
        .upsert_by_phone(&phone, &request.first_name, &request.last_name, Some(address))
        .await?;

    let snapshot = OrderSnapshot {
        customer_id: Some(customer.id),
        customer_name: request.customer_name.clone(),
        customer_phone: phone,
        customer_address: address.to_owned(),
        instructions: request.order_type.instructions().to_owned(),
    };

    Ok((snapshot, items, total))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_type_deserialization() {
        let t: OrderType = serde_json::from_str("\"takeaway\"").unwrap();
        assert_eq!(t, OrderType::Takeaway);

        let t: OrderType = serde_json::from_str("\"delivery\"").unwrap();
        assert_eq!(t, OrderType::Delivery);
    }

    #[test]
    fn test_order_type_instructions() {
        assert_eq!(OrderType::Delivery.instructions(), "⚠️ LIVRAISON");
        assert_eq!(OrderType::Takeaway.instructions(), "A Emporter");
    }
}
