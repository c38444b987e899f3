//! Customer repository.
//!
//! Customer identity is keyed by normalized phone number: checkout and manual
//! order entry upsert against the phone, so repeat callers accumulate order
//! history under one record.

use rust_decimal::Decimal;
use sqlx::PgPool;

use fornaccio_core::{CustomerId, Phone};

use crate::models::{Customer, CustomerDetails, CustomerSummary, NewCustomer, Order};
use crate::{RepositoryError, map_unique_violation};

const CUSTOMER_COLUMNS: &str =
    "id, phone, first_name, last_name, email, address, notes, created_at, updated_at";

/// How many orders a customer detail view includes.
const RECENT_ORDERS_LIMIT: i64 = 10;

/// Repository for customer database operations.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a customer by their normalized phone number.
    ///
    /// Name fields are always refreshed; the address only when one is
    /// provided, so a takeaway order does not blank a known delivery address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn upsert_by_phone(
        &self,
        phone: &Phone,
        first_name: &str,
        last_name: &str,
        address: Option<&str>,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customer (phone, first_name, last_name, address)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (phone) DO UPDATE
             SET first_name = EXCLUDED.first_name,
                 last_name = EXCLUDED.last_name,
                 address = COALESCE(EXCLUDED.address, customer.address),
                 updated_at = now()
             RETURNING id, phone, first_name, last_name, email, address, notes,
                       created_at, updated_at",
        )
        .bind(phone)
        .bind(first_name)
        .bind(last_name)
        .bind(address)
        .fetch_one(self.pool)
        .await?;

        Ok(customer)
    }

    /// List all customers with their order counts, most recently updated
    /// first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<CustomerSummary>, RepositoryError> {
        let customers = sqlx::query_as::<_, CustomerSummary>(
            "SELECT c.id, c.phone, c.first_name, c.last_name, c.email, c.address,
                    c.notes, c.created_at, c.updated_at,
                    COUNT(o.id) AS order_count
             FROM customer c
             LEFT JOIN customer_order o ON o.customer_id = c.id
             GROUP BY c.id
             ORDER BY c.updated_at DESC",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Search customers by name or phone fragment, at most 10 results.
    ///
    /// Queries shorter than two characters return nothing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Customer>, RepositoryError> {
        let query = query.trim();
        if query.chars().count() < 2 {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", query.replace(['%', '_'], ""));
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS}
             FROM customer
             WHERE first_name ILIKE $1 OR last_name ILIKE $1 OR phone ILIKE $1
             ORDER BY updated_at DESC
             LIMIT 10"
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customer WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// Get a customer's file: the record, their last 10 orders and lifetime
    /// spend/order count.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a query fails.
    pub async fn details(&self, id: CustomerId) -> Result<Option<CustomerDetails>, RepositoryError> {
        let Some(customer) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let recent_orders = sqlx::query_as::<_, Order>(
            "SELECT id, customer_id, customer_name, customer_phone, customer_address,
                    instructions, status, total, payment_id, driver_lat, driver_lng,
                    created_at, updated_at
             FROM customer_order
             WHERE customer_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(id)
        .bind(RECENT_ORDERS_LIMIT)
        .fetch_all(self.pool)
        .await?;

        let (total_spent, order_count) = sqlx::query_as::<_, (Decimal, i64)>(
            "SELECT COALESCE(SUM(total), 0), COUNT(*)
             FROM customer_order
             WHERE customer_id = $1",
        )
        .bind(id)
        .fetch_one(self.pool)
        .await?;

        Ok(Some(CustomerDetails {
            customer,
            recent_orders,
            total_spent,
            order_count,
        }))
    }

    /// Create a new customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the phone number already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create(&self, new: &NewCustomer) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "INSERT INTO customer (phone, first_name, last_name, email, address, notes)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, phone, first_name, last_name, email, address, notes,
                       created_at, updated_at",
        )
        .bind(&new.phone)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.address)
        .bind(&new.notes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "phone number already exists"))?;

        Ok(customer)
    }

    /// Update a customer.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Conflict` if the new phone number collides.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn update(
        &self,
        id: CustomerId,
        new: &NewCustomer,
    ) -> Result<Customer, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(
            "UPDATE customer
             SET phone = $1, first_name = $2, last_name = $3, email = $4,
                 address = $5, notes = $6, updated_at = now()
             WHERE id = $7
             RETURNING id, phone, first_name, last_name, email, address, notes,
                       created_at, updated_at",
        )
        .bind(&new.phone)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.email)
        .bind(&new.address)
        .bind(&new.notes)
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "phone number already exists"))?
        .ok_or(RepositoryError::NotFound)?;

        Ok(customer)
    }

    /// Delete a customer. Their orders are kept (the FK nulls out).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the customer doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CustomerId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM customer WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
