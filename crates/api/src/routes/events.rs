//! Event Log Routes

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use event_log::{events, EventRecord, EventSink};

use crate::AppState;

/// Query parameters for the events endpoint
#[derive(Debug, Deserialize)]
pub struct EventQuery {
    /// Filter by event type
    pub event_type: Option<String>,
    /// Maximum number of records
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

/// Response for the events endpoint
#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub data: Vec<EventRecord>,
    pub count: usize,
}

/// Request body for a screen-enter notification
#[derive(Debug, Deserialize)]
pub struct ScreenEnterRequest {
    pub screen_name: String,
}

/// Response for a screen-enter notification
#[derive(Debug, Serialize)]
pub struct ScreenEnterResponse {
    pub status: &'static str,
}

/// Get recent events, newest first
pub async fn get_events(
    State(state): State<Arc<RwLock<AppState>>>,
    Query(params): Query<EventQuery>,
) -> Json<EventsResponse> {
    let app = state.read().await;

    let records = match &params.event_type {
        Some(event_type) => app.events.by_type(event_type),
        None => app.events.all(),
    };
    let data: Vec<EventRecord> = records.into_iter().take(params.limit).collect();

    Json(EventsResponse {
        count: data.len(),
        data,
    })
}

/// Record a screen/session entry from the presentation layer
pub async fn screen_enter(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(request): Json<ScreenEnterRequest>,
) -> Json<ScreenEnterResponse> {
    let app = state.read().await;
    app.events.emit(
        events::SCREEN_ENTER,
        json!({ "screen_name": request.screen_name }),
    );

    Json(ScreenEnterResponse { status: "ok" })
}
