//! Payment settlement logic, shared by three entry points:
//!
//! 1. the provider webhook,
//! 2. the redirect-return validation endpoint the status page polls,
//! 3. the background reconciliation sweeper (for sessions whose webhook
//!    never arrived).
//!
//! The one rule all three obey: an order that has already reached CONFIRMED
//! or beyond is never moved backwards by a late or repeated payment
//! notification.

use sqlx::PgPool;
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use fornaccio_core::{OrderId, OrderStatus};
use fornaccio_db::OrderRepository;
use fornaccio_db::models::Order;

use crate::error::AppError;
use crate::payments::PaymentStatus;
use crate::state::AppState;

/// What a settlement check did to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    /// Payment settled; the order moved to CONFIRMED.
    Confirmed,
    /// The session ended unpaid; the order moved to CANCELLED.
    Cancelled,
    /// Nothing changed; the order keeps the given status.
    Unchanged(OrderStatus),
}

impl PaymentOutcome {
    /// The order status after applying this outcome.
    #[must_use]
    pub const fn status(self) -> OrderStatus {
        match self {
            Self::Confirmed => OrderStatus::Confirmed,
            Self::Cancelled => OrderStatus::Cancelled,
            Self::Unchanged(status) => status,
        }
    }
}

/// Apply a provider payment status to an order.
///
/// # Errors
///
/// Returns `AppError::Database` if persisting the transition fails.
#[instrument(skip(pool), fields(order_id = %order.id))]
pub async fn apply_payment_status(
    pool: &PgPool,
    order: &Order,
    payment_status: PaymentStatus,
) -> Result<PaymentOutcome, AppError> {
    // Never revert an order that staff (or an earlier notification) already
    // moved past the payment gate.
    if !order.status.awaits_payment() {
        return Ok(PaymentOutcome::Unchanged(order.status));
    }

    let orders = OrderRepository::new(pool);

    if payment_status.is_paid() {
        orders.set_status(order.id, OrderStatus::Confirmed).await?;
        send_confirmation_email(order.id);
        info!(order_id = %order.id, "Payment settled, order confirmed");
        return Ok(PaymentOutcome::Confirmed);
    }

    if payment_status.is_failed() {
        orders.set_status(order.id, OrderStatus::Cancelled).await?;
        info!(order_id = %order.id, ?payment_status, "Payment failed, order cancelled");
        return Ok(PaymentOutcome::Cancelled);
    }

    Ok(PaymentOutcome::Unchanged(order.status))
}

/// Fetch the order's payment from the provider and apply its status.
///
/// # Errors
///
/// Returns `AppError::Conflict` if the order has no payment session,
/// `AppError::Payment` if the provider call fails, `AppError::Database` if
/// persisting the transition fails.
pub async fn sync_order_payment(
    state: &AppState,
    order: &Order,
) -> Result<PaymentOutcome, AppError> {
    if !order.status.awaits_payment() {
        return Ok(PaymentOutcome::Unchanged(order.status));
    }

    let Some(payment_id) = order.payment_id.as_deref() else {
        return Err(AppError::Conflict(
            "order has no payment session".to_owned(),
        ));
    };

    let payment = state.mollie().get_payment(payment_id).await?;
    apply_payment_status(state.pool(), order, payment.status).await
}

/// Confirmation email stub.
///
/// The shop has no transactional email provider yet; the webhook/validation
/// path logs instead so the hook point is already in place.
fn send_confirmation_email(order_id: OrderId) {
    info!(%order_id, "Would send order confirmation email");
}

/// Background reconciliation sweeper.
///
/// Every `payment_sweep_interval_secs`, re-checks recent PENDING orders that
/// hold a payment session. Catches sessions whose webhook was never delivered
/// (local development, provider retries exhausted). Stops when the server
/// begins graceful shutdown.
pub async fn run_sweeper(state: AppState, mut shutdown: watch::Receiver<bool>) {
    let interval = std::time::Duration::from_secs(state.config().payment_sweep_interval_secs);
    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so startup stays quiet.
    ticker.tick().await;

    info!(interval_secs = interval.as_secs(), "Payment sweeper started");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = sweep_once(&state).await {
                    warn!(error = %e, "Payment sweep failed");
                }
            }
            _ = shutdown.changed() => {
                info!("Payment sweeper stopping");
                break;
            }
        }
    }
}

/// One reconciliation pass over pending payments.
async fn sweep_once(state: &AppState) -> Result<(), AppError> {
    let orders = OrderRepository::new(state.pool());
    let pending = orders.list_pending_payments().await?;

    if pending.is_empty() {
        return Ok(());
    }

    info!(count = pending.len(), "Sweeping pending payments");

    for order in &pending {
        // One failing payment must not stall the rest of the sweep.
        if let Err(e) = sync_order_payment(state, order).await {
            warn!(order_id = %order.id, error = %e, "Failed to reconcile payment");
        }
    }

    Ok(())
}
