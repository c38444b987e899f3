//! Payment provider webhook.

use axum::{
    Form, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fornaccio_db::OrderRepository;

use crate::error::AppError;
use crate::services::payment_sync;
use crate::state::AppState;

/// The provider posts the payment id as a form-urlencoded `id` field.
#[derive(Debug, Deserialize)]
pub struct MollieWebhookForm {
    #[serde(default)]
    pub id: Option<String>,
}

/// Acknowledgement body.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub received: bool,
}

/// `POST /api/webhooks/mollie`
///
/// The webhook body carries only the payment id; the authoritative status is
/// always re-fetched from the provider, so a forged request can at worst
/// trigger a harmless re-check.
#[instrument(skip(state, form))]
pub async fn mollie(
    State(state): State<AppState>,
    Form(form): Form<MollieWebhookForm>,
) -> Result<Response, AppError> {
    let Some(payment_id) = form.id.filter(|id| !id.is_empty()) else {
        return Ok((StatusCode::BAD_REQUEST, "No payment ID provided").into_response());
    };

    let payment = state.mollie().get_payment(&payment_id).await?;

    let Some(order_id) = payment.order_id() else {
        tracing::warn!(%payment_id, "Webhook payment carries no order metadata");
        return Ok((StatusCode::BAD_REQUEST, "No order metadata").into_response());
    };

    let orders = OrderRepository::new(state.pool());
    let order = orders
        .get(order_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("order {order_id}")))?;

    let outcome = payment_sync::apply_payment_status(state.pool(), &order, payment.status).await?;
    tracing::info!(%payment_id, %order_id, ?outcome, "Webhook processed");

    Ok(Json(WebhookResponse { received: true }).into_response())
}
