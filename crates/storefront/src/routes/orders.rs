//! Checkout and public order tracking.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fornaccio_core::{IngredientId, Modifications, OrderId, OrderStatus, Phone, PizzaId};
use fornaccio_db::models::{NewOrderItem, OrderItem, OrderSnapshot};
use fornaccio_db::{CatalogRepository, CustomerRepository, OrderRepository};

use crate::error::AppError;
use crate::state::AppState;

/// Most pizzas a single line item may carry.
const MAX_ITEM_QUANTITY: u32 = 20;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Checkout form, validated server-side.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub instructions: Option<String>,
    pub items: Vec<CheckoutItem>,
}

/// One customized pizza in the cart.
#[derive(Debug, Deserialize)]
pub struct CheckoutItem {
    pub pizza_id: PizzaId,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub added: Vec<IngredientId>,
    #[serde(default)]
    pub removed: Vec<IngredientId>,
}

const fn default_quantity() -> u32 {
    1
}

/// Response to a successful checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub order_id: OrderId,
    pub total: Decimal,
    pub status: OrderStatus,
}

/// Public order-tracking payload: enough for the status page and the
/// delivery map, nothing more (no payment session, no internal customer id).
#[derive(Debug, Serialize)]
pub struct TrackOrderResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
    pub customer_name: String,
    pub customer_address: String,
    pub total: Decimal,
    pub items: Vec<OrderItem>,
    pub driver_lat: Option<f64>,
    pub driver_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Handlers
// =============================================================================

/// `POST /api/orders` - public checkout.
///
/// Prices are computed here from the live catalog (base price plus the sum of
/// added-ingredient prices, times quantity); the client's own arithmetic is
/// never trusted. The customer record is upserted by normalized phone, and
/// the order plus its frozen item snapshots are written in one transaction.
#[instrument(skip(state, request))]
pub async fn create(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>, AppError> {
    let name = request.name.trim();
    if name.chars().count() < 2 {
        return Err(AppError::BadRequest("name is required".to_owned()));
    }

    let address = request.address.trim();
    if address.chars().count() < 5 {
        return Err(AppError::BadRequest("address is required".to_owned()));
    }

    let phone = Phone::parse(&request.phone)
        .map_err(|e| AppError::BadRequest(format!("invalid phone number: {e}")))?;

    if request.items.is_empty() {
        return Err(AppError::BadRequest("cart is empty".to_owned()));
    }

    let (items, total) = price_items(&state, &request.items).await?;

    let (first_name, last_name) = split_name(name);
    let customers = CustomerRepository::new(state.pool());
    let customer = customers
        .upsert_by_phone(&phone, &first_name, &last_name, Some(address))
        .await?;

    let snapshot = OrderSnapshot {
        customer_id: Some(customer.id),
        customer_name: name.to_owned(),
        customer_phone: phone,
        customer_address: address.to_owned(),
        instructions: request.instructions.unwrap_or_default(),
    };

    let orders = OrderRepository::new(state.pool());
    let created = orders.create(&snapshot, total, &items).await?;

    tracing::info!(order_id = %created.order.id, %total, "Order created");

    Ok(Json(CheckoutResponse {
        order_id: created.order.id,
        total: created.order.total,
        status: created.order.status,
    }))
}

/// `GET /api/orders/{id}` - public status tracking.
///
/// Polled by the status page; includes the last-known driver coordinates for
/// the delivery map.
#[instrument(skip(state))]
pub async fn track(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<TrackOrderResponse>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get_with_items(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    Ok(Json(TrackOrderResponse {
        order_id: order.order.id,
        status: order.order.status,
        customer_name: order.order.customer_name,
        customer_address: order.order.customer_address,
        total: order.order.total,
        items: order.items,
        driver_lat: order.order.driver_lat,
        driver_lng: order.order.driver_lng,
        created_at: order.order.created_at,
        updated_at: order.order.updated_at,
    }))
}

// =============================================================================
// Pricing
// =============================================================================

/// Resolve cart items against the catalog and compute the authoritative total.
async fn price_items(
    state: &AppState,
    items: &[CheckoutItem],
) -> Result<(Vec<NewOrderItem>, Decimal), AppError> {
    let catalog = CatalogRepository::new(state.pool());

    let pizza_ids: Vec<PizzaId> = items.iter().map(|i| i.pizza_id).collect();
    let pizzas: HashMap<PizzaId, _> = catalog
        .get_pizzas_by_ids(&pizza_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let ingredient_ids: Vec<IngredientId> = items
        .iter()
        .flat_map(|i| i.added.iter().chain(i.removed.iter()).copied())
        .collect();
    let ingredients: HashMap<IngredientId, _> = catalog
        .get_ingredients_by_ids(&ingredient_ids)
        .await?
        .into_iter()
        .map(|i| (i.id, i))
        .collect();

    let mut priced = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;

    for item in items {
        let pizza = pizzas
            .get(&item.pizza_id)
            .filter(|p| p.is_available)
            .ok_or_else(|| {
                AppError::BadRequest(format!("pizza {} is not available", item.pizza_id))
            })?;

        if item.quantity == 0 || item.quantity > MAX_ITEM_QUANTITY {
            return Err(AppError::BadRequest(format!(
                "quantity must be between 1 and {MAX_ITEM_QUANTITY}"
            )));
        }

        let mut unit_price = pizza.base_price;
        for added in &item.added {
            let ingredient = ingredients
                .get(added)
                .filter(|i| i.is_available)
                .ok_or_else(|| {
                    AppError::BadRequest(format!("ingredient {added} is not available"))
                })?;
            unit_price += ingredient.price;
        }

        // Removals must at least reference real ingredients
        for removed in &item.removed {
            if !ingredients.contains_key(removed) {
                return Err(AppError::BadRequest(format!(
                    "unknown ingredient {removed}"
                )));
            }
        }

        let final_price = unit_price * Decimal::from(item.quantity);
        total += final_price;

        priced.push(NewOrderItem {
            pizza_name: pizza.name.clone(),
            base_price: pizza.base_price,
            final_price,
            quantity: i32::try_from(item.quantity).unwrap_or(1),
            modifications: Modifications {
                added: item.added.clone(),
                removed: item.removed.clone(),
            },
        });
    }

    Ok((priced, total))
}

/// Split a full name into first/last: the last whitespace-separated word is
/// the last name, the rest the first name. A single word fills both.
fn split_name(name: &str) -> (String, String) {
    let mut parts: Vec<&str> = name.split_whitespace().collect();
    match parts.len() {
        0 => (String::new(), String::new()),
        1 => (name.trim().to_owned(), name.trim().to_owned()),
        _ => {
            let last = parts.pop().unwrap_or_default();
            (parts.join(" "), last.to_owned())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_name_two_words() {
        assert_eq!(
            split_name("Jean Dupont"),
            ("Jean".to_owned(), "Dupont".to_owned())
        );
    }

    #[test]
    fn test_split_name_multiple_words() {
        assert_eq!(
            split_name("Jean Marie Dupont"),
            ("Jean Marie".to_owned(), "Dupont".to_owned())
        );
    }

    #[test]
    fn test_split_name_single_word() {
        assert_eq!(
            split_name("Madonna"),
            ("Madonna".to_owned(), "Madonna".to_owned())
        );
    }

    #[test]
    fn test_checkout_item_defaults() {
        let item: CheckoutItem = serde_json::from_str(r#"{"pizza_id": 1}"#).unwrap();
        assert_eq!(item.quantity, 1);
        assert!(item.added.is_empty());
        assert!(item.removed.is_empty());
    }
}
