//! Nap Session Routes

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use sessions::NapStart;

use crate::{ApiError, AppState};

/// Request body for starting a nap
#[derive(Debug, Deserialize)]
pub struct NapStartRequest {
    pub minutes: u32,
}

/// Response for a cancel request
#[derive(Debug, Serialize)]
pub struct NapCancelResponse {
    pub elapsed_seconds: u32,
    pub remaining_quota: u32,
}

/// Response for an acknowledge request
#[derive(Debug, Serialize)]
pub struct AckResponse {
    pub status: &'static str,
}

/// Start a nap countdown; grants are clamped to the remaining daily quota
pub async fn start(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<NapStartRequest>,
) -> Result<Json<NapStart>, ApiError> {
    let now = Utc::now();
    let mut app = state.write().await;

    let start = app.nap.request_start(request.minutes * 60, now)?;
    Ok(Json(start))
}

/// Cancel the running countdown
pub async fn cancel(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<NapCancelResponse>, ApiError> {
    let now = Utc::now();
    let mut app = state.write().await;

    let elapsed = app.nap.cancel(now)?;
    Ok(Json(NapCancelResponse {
        elapsed_seconds: elapsed,
        remaining_quota: app.nap.remaining_quota(now),
    }))
}

/// Acknowledge the wake alarm (subject confirmed awake)
pub async fn acknowledge(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<AckResponse>, ApiError> {
    state.write().await.nap.acknowledge(Utc::now())?;
    Ok(Json(AckResponse {
        status: "acknowledged",
    }))
}
