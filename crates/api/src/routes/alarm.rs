//! Alarm Routes

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

use sessions::AlarmOutcome;

use crate::{ApiError, AppState};

/// Response for a trigger request
#[derive(Debug, Serialize)]
pub struct TriggerResponse {
    #[serde(flatten)]
    pub result: AlarmOutcome,
    /// Whether further triggers are permitted
    pub allowed: bool,
}

/// Response for a reset request
#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub status: &'static str,
}

/// Fire the alarm once
pub async fn trigger(
    State(state): State<Arc<RwLock<AppState>>>,
) -> Result<Json<TriggerResponse>, ApiError> {
    let mut app = state.write().await;

    let result = app.alarm.trigger()?;
    let allowed = app.alarm.is_allowed();

    Ok(Json(TriggerResponse { result, allowed }))
}

/// Reset the alarm session
pub async fn reset(State(state): State<Arc<RwLock<AppState>>>) -> Json<ResetResponse> {
    state.write().await.alarm.reset();
    Json(ResetResponse { status: "reset" })
}
