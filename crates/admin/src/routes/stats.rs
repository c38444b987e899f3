//! Sales statistics for the dashboard.

use axum::{Json, extract::State};
use tracing::instrument;

use fornaccio_db::OrderRepository;
use fornaccio_db::models::StatsSummary;

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// `GET /api/stats` - today's and lifetime revenue/order counts plus the
/// top five best sellers. Cancelled orders never count.
#[instrument(skip(state))]
pub async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<StatsSummary>, AppError> {
    let orders = OrderRepository::new(state.pool());
    Ok(Json(orders.stats().await?))
}
