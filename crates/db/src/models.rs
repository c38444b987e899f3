//! Domain models for the shared schema.
//!
//! Custom field types (`Phone`, `OrderStatus`, `IngredientCategory`, ID
//! newtypes) decode and normalize themselves at the sqlx layer, so most
//! models derive `FromRow` directly.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use fornaccio_core::{
    CustomerId, IngredientCategory, IngredientId, Modifications, OrderId, OrderItemId, OrderStatus,
    Phone, PizzaId,
};

/// A customer record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerId,
    pub phone: Phone,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A customer record together with their order count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CustomerSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: Customer,
    pub order_count: i64,
}

/// A customer's file: recent orders and lifetime aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerDetails {
    #[serde(flatten)]
    pub customer: Customer,
    pub recent_orders: Vec<Order>,
    pub total_spent: Decimal,
    pub order_count: i64,
}

/// A catalog pizza.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Pizza {
    pub id: PizzaId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    pub image: String,
    pub default_ingredients: Vec<IngredientId>,
    pub is_available: bool,
}

/// A priced ingredient add-on.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: IngredientId,
    pub slug: String,
    pub name: String,
    pub price: Decimal,
    pub category: IngredientCategory,
    pub is_available: bool,
}

/// An order, with customer details snapshotted at order time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub customer_phone: Phone,
    pub customer_address: String,
    pub instructions: String,
    pub status: OrderStatus,
    pub total: Decimal,
    pub payment_id: Option<String>,
    pub driver_lat: Option<f64>,
    pub driver_lng: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An order line item: pizza name, prices and modification snapshot, frozen
/// at order time.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub pizza_name: String,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub quantity: i32,
    pub modifications: Modifications,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Parameters for creating a customer.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub phone: Phone,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

/// Parameters for creating a pizza.
#[derive(Debug, Clone)]
pub struct NewPizza {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    pub image: String,
    pub default_ingredients: Vec<IngredientId>,
}

/// Parameters for updating a pizza.
#[derive(Debug, Clone)]
pub struct UpdatePizza {
    pub name: String,
    pub description: String,
    pub base_price: Decimal,
    pub image: String,
    pub default_ingredients: Vec<IngredientId>,
    pub is_available: bool,
}

/// Parameters for creating an ingredient.
#[derive(Debug, Clone)]
pub struct NewIngredient {
    pub slug: String,
    pub name: String,
    pub price: Decimal,
    pub category: IngredientCategory,
}

/// Parameters for updating an ingredient.
#[derive(Debug, Clone)]
pub struct UpdateIngredient {
    pub name: String,
    pub price: Decimal,
    pub category: IngredientCategory,
    pub is_available: bool,
}

/// Customer snapshot carried on a new or updated order.
#[derive(Debug, Clone)]
pub struct OrderSnapshot {
    pub customer_id: Option<CustomerId>,
    pub customer_name: String,
    pub customer_phone: Phone,
    pub customer_address: String,
    pub instructions: String,
}

/// A line item to attach to a new or updated order.
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub pizza_name: String,
    pub base_price: Decimal,
    pub final_price: Decimal,
    pub quantity: i32,
    pub modifications: Modifications,
}

/// Sales statistics for the admin dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct StatsSummary {
    pub daily_revenue: Decimal,
    pub daily_orders: i64,
    pub total_revenue: Decimal,
    pub total_orders: i64,
    pub best_sellers: Vec<BestSeller>,
}

/// A best-selling pizza, aggregated over non-cancelled order items.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct BestSeller {
    pub name: String,
    pub units: i64,
    pub revenue: Decimal,
}
