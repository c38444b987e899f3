//! Order repository.
//!
//! Orders snapshot everything they need at creation time (customer details,
//! pizza names, prices, modification lists); nothing is joined back to the
//! live catalog when reading history.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};

use fornaccio_core::{Modifications, OrderId, OrderStatus};

use crate::RepositoryError;
use crate::models::{
    BestSeller, NewOrderItem, Order, OrderItem, OrderSnapshot, OrderWithItems, StatsSummary,
};

const ORDER_COLUMNS: &str = "id, customer_id, customer_name, customer_phone, customer_address,
     instructions, status, total, payment_id, driver_lat, driver_lng, created_at, updated_at";

/// How far back the payment sweeper looks for unsettled orders.
const PENDING_PAYMENT_WINDOW: &str = "1 day";

/// Internal row type for order line items; the two id arrays fold into one
/// [`Modifications`] snapshot on the domain type.
#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: fornaccio_core::OrderItemId,
    order_id: OrderId,
    pizza_name: String,
    base_price: Decimal,
    final_price: Decimal,
    quantity: i32,
    added_ingredients: Vec<fornaccio_core::IngredientId>,
    removed_ingredients: Vec<fornaccio_core::IngredientId>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(row: OrderItemRow) -> Self {
        Self {
            id: row.id,
            order_id: row.order_id,
            pizza_name: row.pizza_name,
            base_price: row.base_price,
            final_price: row.final_price,
            quantity: row.quantity,
            modifications: Modifications {
                added: row.added_ingredients,
                removed: row.removed_ingredients,
            },
        }
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create an order with its line items in one transaction.
    ///
    /// The order starts in [`OrderStatus::Pending`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any statement fails; nothing is
    /// persisted in that case.
    pub async fn create(
        &self,
        snapshot: &OrderSnapshot,
        total: Decimal,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "INSERT INTO customer_order
                 (customer_id, customer_name, customer_phone, customer_address,
                  instructions, status, total)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(snapshot.customer_id)
        .bind(&snapshot.customer_name)
        .bind(&snapshot.customer_phone)
        .bind(&snapshot.customer_address)
        .bind(&snapshot.instructions)
        .bind(OrderStatus::Pending)
        .bind(total)
        .fetch_one(&mut *tx)
        .await?;

        let inserted = insert_items(&mut tx, order.id, items).await?;
        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            items: inserted,
        })
    }

    /// Replace an order's customer snapshot, total and line items atomically.
    ///
    /// Used by manual order editing: the old items are deleted and the new
    /// set inserted in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn replace(
        &self,
        id: OrderId,
        snapshot: &OrderSnapshot,
        total: Decimal,
        items: &[NewOrderItem],
    ) -> Result<OrderWithItems, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM order_item WHERE order_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE customer_order
             SET customer_id = $1, customer_name = $2, customer_phone = $3,
                 customer_address = $4, instructions = $5, total = $6,
                 updated_at = now()
             WHERE id = $7
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(snapshot.customer_id)
        .bind(&snapshot.customer_name)
        .bind(&snapshot.customer_phone)
        .bind(&snapshot.customer_address)
        .bind(&snapshot.instructions)
        .bind(total)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let inserted = insert_items(&mut tx, order.id, items).await?;
        tx.commit().await?;

        Ok(OrderWithItems {
            order,
            items: inserted,
        })
    }

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: OrderId) -> Result<Option<Order>, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(order)
    }

    /// Get an order with its line items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn get_with_items(
        &self,
        id: OrderId,
    ) -> Result<Option<OrderWithItems>, RepositoryError> {
        let Some(order) = self.get(id).await? else {
            return Ok(None);
        };

        let items = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, pizza_name, base_price, final_price, quantity,
                    added_ingredients, removed_ingredients
             FROM order_item
             WHERE order_id = $1
             ORDER BY id ASC",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(Some(OrderWithItems {
            order,
            items: items.into_iter().map(Into::into).collect(),
        }))
    }

    /// List orders in any of the given statuses, newest first, with items.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn list_by_statuses(
        &self,
        statuses: &[OrderStatus],
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        let status_strings: Vec<String> =
            statuses.iter().map(|s| s.as_str().to_owned()).collect();

        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order
             WHERE status = ANY($1)
             ORDER BY created_at DESC"
        ))
        .bind(status_strings)
        .fetch_all(self.pool)
        .await?;

        self.attach_items(orders).await
    }

    /// Update an order's status.
    ///
    /// Transition validity is the caller's concern; this persists
    /// unconditionally and bumps `updated_at` so status pollers notice.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE customer_order
             SET status = $1, updated_at = now()
             WHERE id = $2
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(order)
    }

    /// Attach a payment session id to an order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_payment_id(
        &self,
        id: OrderId,
        payment_id: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer_order SET payment_id = $1, updated_at = now() WHERE id = $2",
        )
        .bind(payment_id)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Update the driver coordinates on a single order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the order doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn set_driver_location(
        &self,
        id: OrderId,
        lat: f64,
        lng: f64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE customer_order
             SET driver_lat = $1, driver_lng = $2, updated_at = now()
             WHERE id = $3",
        )
        .bind(lat)
        .bind(lng)
        .bind(id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Fan a GPS beacon position out to every order in the active-delivery
    /// set. Returns the number of orders touched.
    ///
    /// There is no driver/vehicle table: the single driver on the road is
    /// assumed to be the one reporting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn update_active_driver_locations(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<u64, RepositoryError> {
        let active: Vec<String> = OrderStatus::ACTIVE_DELIVERY
            .iter()
            .map(|s| s.as_str().to_owned())
            .collect();

        let result = sqlx::query(
            "UPDATE customer_order
             SET driver_lat = $1, driver_lng = $2, updated_at = now()
             WHERE status = ANY($3)",
        )
        .bind(lat)
        .bind(lng)
        .bind(active)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// List recent orders still waiting on an external payment: status
    /// PENDING, a payment session attached, created within the sweep window.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_pending_payments(&self) -> Result<Vec<Order>, RepositoryError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM customer_order
             WHERE status = $1
               AND payment_id IS NOT NULL
               AND created_at >= now() - INTERVAL '{PENDING_PAYMENT_WINDOW}'
             ORDER BY created_at ASC"
        ))
        .bind(OrderStatus::Pending)
        .fetch_all(self.pool)
        .await?;

        Ok(orders)
    }

    /// Compute dashboard sales statistics: today's and lifetime revenue and
    /// order counts (cancelled orders excluded) plus the top five best
    /// sellers by revenue.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn stats(&self) -> Result<StatsSummary, RepositoryError> {
        let (daily_revenue, daily_orders) = sqlx::query_as::<_, (Decimal, i64)>(
            "SELECT COALESCE(SUM(total), 0), COUNT(*)
             FROM customer_order
             WHERE status <> 'CANCELLED'
               AND created_at >= date_trunc('day', now())",
        )
        .fetch_one(self.pool)
        .await?;

        let (total_revenue, total_orders) = sqlx::query_as::<_, (Decimal, i64)>(
            "SELECT COALESCE(SUM(total), 0), COUNT(*)
             FROM customer_order
             WHERE status <> 'CANCELLED'",
        )
        .fetch_one(self.pool)
        .await?;

        let best_sellers = sqlx::query_as::<_, BestSeller>(
            "SELECT oi.pizza_name AS name,
                    COALESCE(SUM(oi.quantity), 0)::BIGINT AS units,
                    COALESCE(SUM(oi.final_price), 0) AS revenue
             FROM order_item oi
             JOIN customer_order o ON o.id = oi.order_id
             WHERE o.status <> 'CANCELLED'
             GROUP BY oi.pizza_name
             ORDER BY revenue DESC
             LIMIT 5",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(StatsSummary {
            daily_revenue,
            daily_orders,
            total_revenue,
            total_orders,
            best_sellers,
        })
    }

    /// Fetch line items for a batch of orders and zip them back together,
    /// preserving the input ordering.
    async fn attach_items(
        &self,
        orders: Vec<Order>,
    ) -> Result<Vec<OrderWithItems>, RepositoryError> {
        if orders.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = orders.iter().map(|o| o.id.as_i32()).collect();
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT id, order_id, pizza_name, base_price, final_price, quantity,
                    added_ingredients, removed_ingredients
             FROM order_item
             WHERE order_id = ANY($1)
             ORDER BY id ASC",
        )
        .bind(ids)
        .fetch_all(self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(row.into());
        }

        Ok(orders
            .into_iter()
            .map(|order| {
                let items = by_order.remove(&order.id).unwrap_or_default();
                OrderWithItems { order, items }
            })
            .collect())
    }
}

/// Insert line items for an order inside an open transaction.
async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    order_id: OrderId,
    items: &[NewOrderItem],
) -> Result<Vec<OrderItem>, RepositoryError> {
    let mut inserted = Vec::with_capacity(items.len());

    for item in items {
        let row = sqlx::query_as::<_, OrderItemRow>(
            "INSERT INTO order_item
                 (order_id, pizza_name, base_price, final_price, quantity,
                  added_ingredients, removed_ingredients)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, order_id, pizza_name, base_price, final_price, quantity,
                       added_ingredients, removed_ingredients",
        )
        .bind(order_id)
        .bind(&item.pizza_name)
        .bind(item.base_price)
        .bind(item.final_price)
        .bind(item.quantity)
        .bind(&item.modifications.added)
        .bind(&item.modifications.removed)
        .fetch_one(&mut **tx)
        .await?;

        inserted.push(row.into());
    }

    Ok(inserted)
}
