//! Customer file management.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use fornaccio_core::{CustomerId, Phone};
use fornaccio_db::models::{Customer, CustomerDetails, CustomerSummary, NewCustomer};
use fornaccio_db::{CustomerRepository, RepositoryError};

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// Customer create/update form.
#[derive(Debug, Deserialize)]
pub struct CustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CustomerRequest {
    /// Validate and normalize into repository parameters.
    fn into_new_customer(self) -> Result<NewCustomer, AppError> {
        let phone = Phone::parse(&self.phone)
            .map_err(|e| AppError::BadRequest(format!("invalid phone number: {e}")))?;

        if self.first_name.trim().is_empty() && self.last_name.trim().is_empty() {
            return Err(AppError::BadRequest("name is required".to_owned()));
        }

        Ok(NewCustomer {
            phone,
            first_name: self.first_name.trim().to_owned(),
            last_name: self.last_name.trim().to_owned(),
            email: self.email.filter(|e| !e.trim().is_empty()),
            address: self.address.filter(|a| !a.trim().is_empty()),
            notes: self.notes.filter(|n| !n.trim().is_empty()),
        })
    }
}

/// Search query string.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

/// `GET /api/customers` - everyone, with order counts, recently active first.
#[instrument(skip(state))]
pub async fn list(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerSummary>>, AppError> {
    let customers = CustomerRepository::new(state.pool());
    Ok(Json(customers.list_all().await?))
}

/// `GET /api/customers/search?q=` - autocomplete for manual order entry.
#[instrument(skip(state))]
pub async fn search(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Customer>>, AppError> {
    let customers = CustomerRepository::new(state.pool());
    Ok(Json(customers.search(&params.q).await?))
}

/// `GET /api/customers/{id}` - customer file with recent orders and lifetime
/// aggregates.
#[instrument(skip(state))]
pub async fn details(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<CustomerDetails>, AppError> {
    let customers = CustomerRepository::new(state.pool());
    let details = customers
        .details(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;

    Ok(Json(details))
}

/// `POST /api/customers`
#[instrument(skip(state, request))]
pub async fn create(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let new = request.into_new_customer()?;
    let customers = CustomerRepository::new(state.pool());

    let customer = match customers.create(&new).await {
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        other => other?,
    };

    Ok(Json(customer))
}

/// `PUT /api/customers/{id}`
#[instrument(skip(state, request))]
pub async fn update(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
    Json(request): Json<CustomerRequest>,
) -> Result<Json<Customer>, AppError> {
    let new = request.into_new_customer()?;
    let customers = CustomerRepository::new(state.pool());

    let customer = match customers.update(id, &new).await {
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!("customer {id}")));
        }
        Err(RepositoryError::Conflict(msg)) => return Err(AppError::Conflict(msg)),
        other => other?,
    };

    Ok(Json(customer))
}

/// `DELETE /api/customers/{id}` - removes the record; their orders survive
/// with the customer link nulled out.
#[instrument(skip(state))]
pub async fn delete(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
    Path(id): Path<CustomerId>,
) -> Result<Json<serde_json::Value>, AppError> {
    let customers = CustomerRepository::new(state.pool());

    match customers.delete(id).await {
        Err(RepositoryError::NotFound) => Err(AppError::NotFound(format!("customer {id}"))),
        other => {
            other?;
            Ok(Json(serde_json::json!({ "deleted": true })))
        }
    }
}
