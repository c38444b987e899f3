//! Kanban order board.
//!
//! Three columns, matching how the kitchen actually works: new orders
//! (pending and confirmed together - the payment gate is invisible to the
//! cook), in the oven, and ready/out for delivery.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use fornaccio_core::OrderStatus;
use fornaccio_db::OrderRepository;
use fornaccio_db::models::OrderWithItems;

use crate::error::AppError;
use crate::middleware::RequireStaff;
use crate::state::AppState;

/// The board: one entry per column, orders newest first.
#[derive(Debug, Serialize)]
pub struct BoardResponse {
    pub columns: Vec<BoardColumn>,
}

/// One kanban column.
#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub key: &'static str,
    pub title: &'static str,
    pub orders: Vec<OrderWithItems>,
}

/// `GET /api/board`
#[instrument(skip(state))]
pub async fn show(
    RequireStaff(_staff): RequireStaff,
    State(state): State<AppState>,
) -> Result<Json<BoardResponse>, AppError> {
    let orders = OrderRepository::new(state.pool());
    let listed = orders
        .list_by_statuses(&[
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Preparing,
            OrderStatus::Ready,
        ])
        .await?;

    let mut new = Vec::new();
    let mut preparing = Vec::new();
    let mut ready = Vec::new();

    for order in listed {
        match order.order.status {
            OrderStatus::Pending | OrderStatus::Confirmed => new.push(order),
            OrderStatus::Preparing => preparing.push(order),
            _ => ready.push(order),
        }
    }

    Ok(Json(BoardResponse {
        columns: vec![
            BoardColumn {
                key: "NEW",
                title: "Nouvelles",
                orders: new,
            },
            BoardColumn {
                key: "PREPARING",
                title: "Au Four",
                orders: preparing,
            },
            BoardColumn {
                key: "READY",
                title: "Prêt / Livraison",
                orders: ready,
            },
        ],
    }))
}
