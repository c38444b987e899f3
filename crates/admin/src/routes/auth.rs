//! Staff login and logout.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::verify_password;
use crate::error::AppError;
use crate::middleware::auth::{clear_session, set_current_staff};
use crate::models::CurrentStaff;
use crate::state::AppState;

/// Login form: the shop uses one shared staff password.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

/// Login confirmation.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub logged_in: bool,
}

/// `POST /auth/login`
#[instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if !verify_password(state.config(), &request.password) {
        tracing::warn!("Failed staff login attempt");
        return Err(AppError::Unauthorized("invalid password".to_owned()));
    }

    let staff = CurrentStaff {
        logged_in_at: Utc::now(),
    };
    set_current_staff(&session, &staff)
        .await
        .map_err(|e| AppError::Internal(format!("failed to store session: {e}")))?;

    tracing::info!("Staff logged in");
    Ok(Json(LoginResponse { logged_in: true }))
}

/// `POST /auth/logout`
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<LoginResponse>, AppError> {
    clear_session(&session)
        .await
        .map_err(|e| AppError::Internal(format!("failed to clear session: {e}")))?;

    Ok(Json(LoginResponse { logged_in: false }))
}
