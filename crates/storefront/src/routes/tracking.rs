//! GPS beacon ingestion (OsmAnd protocol, as sent by Traccar clients).
//!
//! The driver's phone runs a tracker app that fires `GET`/`POST` requests
//! with `id`, `lat` and `lon` query parameters at a configurable interval.
//! There is no driver/vehicle table: the position fans out to every order in
//! the active-delivery set, on the assumption that the single driver on the
//! road is the one reporting.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use fornaccio_db::OrderRepository;

use crate::error::AppError;
use crate::state::AppState;

/// OsmAnd-protocol query parameters. Trackers send more (speed, bearing,
/// battery); only position is consumed.
#[derive(Debug, Deserialize)]
pub struct BeaconParams {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// `GET|POST /api/tracking/traccar`
///
/// Responds with plain `OK` - tracker apps retry on anything else and the
/// body is never displayed.
#[instrument(skip(state))]
pub async fn ingest(
    State(state): State<AppState>,
    Query(params): Query<BeaconParams>,
) -> Result<Response, AppError> {
    let (Some(device_id), Some(lat), Some(lon)) = (params.id.as_deref(), params.lat, params.lon)
    else {
        return Ok((StatusCode::BAD_REQUEST, "Missing params").into_response());
    };

    // (0, 0) is a tracker cold-start artifact, not a position in Belgium
    if lat == 0.0 || lon == 0.0 {
        return Ok((StatusCode::BAD_REQUEST, "Missing params").into_response());
    }

    let orders = OrderRepository::new(state.pool());
    let updated = orders.update_active_driver_locations(lat, lon).await?;

    tracing::info!(device_id, lat, lon, updated, "Beacon position applied to active orders");

    Ok((StatusCode::OK, "OK").into_response())
}
