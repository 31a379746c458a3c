//! Scoring Routes

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use drowsiness::{DrowsyState, Sample, ScoreResult};
use event_log::{events, EventSink};

use crate::AppState;

/// Snapshot of the current drowsiness estimate
#[derive(Debug, Serialize)]
pub struct DrowsyResponse {
    pub timestamp: String,
    /// Composite score of the last scored frame, 0 before any sample
    pub drowsy_level: f64,
    pub state: DrowsyState,
    /// Full result of the last scored frame
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<ScoreResult>,
}

/// Ingest one frame sample from the landmark producer and score it
pub async fn ingest_sample(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(sample): Json<Sample>,
) -> Json<ScoreResult> {
    let mut app = state.write().await;

    let previous = app
        .last_score
        .as_ref()
        .map(|r| r.state)
        .unwrap_or_default();

    let result = app.scorer.update(&sample);
    app.samples_scored += 1;

    if result.state != previous {
        app.events.emit(
            events::DROWSINESS_CHANGE,
            json!({
                "old_level": previous,
                "new_level": result.state,
                "score": result.composite,
            }),
        );
    }

    app.last_score = Some(result.clone());
    Json(result)
}

/// Get the latest drowsiness estimate
pub async fn get_status(State(state): State<Arc<RwLock<AppState>>>) -> Json<DrowsyResponse> {
    let app = state.read().await;

    let (drowsy_level, state) = app
        .last_score
        .as_ref()
        .map(|r| (r.composite, r.state))
        .unwrap_or((0.0, DrowsyState::Normal));

    Json(DrowsyResponse {
        timestamp: Utc::now().to_rfc3339(),
        drowsy_level,
        state,
        detail: app.last_score.clone(),
    })
}
