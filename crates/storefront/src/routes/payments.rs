//! Payment session creation and redirect-return validation.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tracing::instrument;

use fornaccio_core::{OrderId, OrderStatus};
use fornaccio_db::OrderRepository;

use crate::error::AppError;
use crate::payments::{Amount, CreatePaymentRequest, PaymentMetadata};
use crate::services::payment_sync;
use crate::state::AppState;

/// Response to payment session creation: where to send the customer.
#[derive(Debug, Serialize)]
pub struct CreatePaymentResponse {
    pub checkout_url: String,
}

/// Response to a validation poll.
#[derive(Debug, Serialize)]
pub struct ValidatePaymentResponse {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// `POST /api/orders/{id}/payment` - create a hosted payment session.
///
/// The amount comes from the stored order total, never from the client. The
/// webhook URL is omitted for localhost deployments (the provider cannot
/// reach them); the validation endpoint and the background sweeper cover
/// settlement there.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<CreatePaymentResponse>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    if !order.status.awaits_payment() {
        return Err(AppError::Conflict(
            "order is not awaiting payment".to_owned(),
        ));
    }

    let base_url = state.config().base_url.trim_end_matches('/');
    let webhook_url = if state.config().is_localhost() {
        None
    } else {
        Some(format!("{base_url}/api/webhooks/mollie"))
    };

    let request = CreatePaymentRequest {
        amount: Amount::eur(order.total),
        description: format!("Commande #{}", order.id),
        redirect_url: format!("{base_url}/order/{}/status", order.id),
        webhook_url,
        metadata: PaymentMetadata { order_id: order.id },
    };

    let payment = state.mollie().create_payment(&request).await?;

    // Remember the session so the validation endpoint and the sweeper can
    // re-check it later.
    orders.set_payment_id(order.id, &payment.id).await?;

    let checkout_url = payment
        .checkout_url()
        .ok_or_else(|| AppError::Internal("payment session has no checkout URL".to_owned()))?
        .to_owned();

    tracing::info!(order_id = %order.id, payment_id = %payment.id, "Payment session created");

    Ok(Json(CreatePaymentResponse { checkout_url }))
}

/// `POST /api/orders/{id}/payment/validate` - redirect-return polling.
///
/// The status page calls this when the customer comes back from the hosted
/// checkout. Confirms or cancels the order based on the provider's view;
/// an order already past the payment gate is reported as-is, untouched.
#[instrument(skip(state))]
pub async fn validate(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<ValidatePaymentResponse>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))?;

    let outcome = payment_sync::sync_order_payment(&state, &order).await?;

    Ok(Json(ValidatePaymentResponse {
        order_id: order.id,
        status: outcome.status(),
    }))
}
