//! Drowsiness Pipeline API Server
//!
//! REST transport for the scoring and session pipeline. Handlers map 1:1
//! onto the scorer and session controllers; the 1-second nap tick runs as
//! a background task sharing the same state lock, so every state mutation
//! goes through one critical section.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

mod routes;
mod settings;

pub use settings::AppSettings;

use drowsiness::{ConfigError, DrowsinessScorer, ScoreResult};
use event_log::{EventSink, MemorySink};
use sessions::{AlarmSession, NapPhase, NapSession, SessionError};

/// Application state shared across handlers and the tick task
pub struct AppState {
    pub scorer: DrowsinessScorer,
    pub alarm: AlarmSession,
    pub nap: NapSession,
    /// Event buffer shared with the controllers
    pub events: Arc<MemorySink>,
    /// Most recent scoring result
    pub last_score: Option<ScoreResult>,
    /// Samples scored since startup
    pub samples_scored: usize,
    pub version: String,
    pub start_time: Instant,
}

impl AppState {
    /// Create application state from settings
    pub fn new(settings: &AppSettings) -> Result<Self, ConfigError> {
        let events = Arc::new(MemorySink::default());
        let sink: Arc<dyn EventSink> = events.clone();

        Ok(Self {
            scorer: DrowsinessScorer::new(settings.scorer.clone())?,
            alarm: AlarmSession::new(settings.alarm.clone(), Arc::clone(&sink)),
            nap: NapSession::new(settings.nap.clone(), sink),
            events,
            last_score: None,
            samples_scored: 0,
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: Instant::now(),
        })
    }
}

/// Error body for rejected operations
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

/// Rejected-operation responses (HTTP 409 with a structured body)
#[derive(Debug)]
pub struct ApiError(pub SessionError);

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let error = match &self.0 {
            SessionError::AlarmLocked { .. } => "alarm_locked",
            SessionError::QuotaExhausted { .. } => "quota_exhausted",
            SessionError::InvalidPhase { .. } => "invalid_state",
        };
        let body = ErrorBody {
            error,
            message: self.0.to_string(),
        };
        (StatusCode::CONFLICT, Json(body)).into_response()
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub scorer_calibrated: bool,
    pub nap_phase: NapPhase,
    pub alarm_allowed: bool,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub samples_scored: usize,
    pub event_count: usize,
}

/// Create the application router
pub fn create_router(state: Arc<RwLock<AppState>>) -> Router {
    Router::new()
        .route("/api/v1/health", get(health_handler))
        .route("/api/v1/samples", post(routes::drowsy::ingest_sample))
        .route("/api/v1/drowsy", get(routes::drowsy::get_status))
        .route("/api/v1/alarm/trigger", post(routes::alarm::trigger))
        .route("/api/v1/alarm/reset", post(routes::alarm::reset))
        .route("/api/v1/nap/start", post(routes::nap::start))
        .route("/api/v1/nap/cancel", post(routes::nap::cancel))
        .route("/api/v1/nap/acknowledge", post(routes::nap::acknowledge))
        .route("/api/v1/events", get(routes::events::get_events))
        .route("/api/v1/screens/enter", post(routes::events::screen_enter))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;

    let response = HealthResponse {
        status: "healthy".to_string(),
        timestamp: Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            scorer_calibrated: state.scorer.baseline().calibrated,
            nap_phase: state.nap.phase(),
            alarm_allowed: state.alarm.is_allowed(),
        },
        metrics: SystemMetrics {
            samples_scored: state.samples_scored,
            event_count: state.events.len(),
        },
    };

    Json(response)
}

/// Drive the nap countdown and acknowledge-deadline checks at 1 Hz.
///
/// The task takes the same write lock as the HTTP handlers, so every
/// operation observes one consistent `now`. Outside Running/Alarming the
/// tick is a no-op, which makes cancellation safe without tearing the
/// task down.
pub fn spawn_tick_task(state: Arc<RwLock<AppState>>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            interval.tick().await;
            let now = Utc::now();
            let mut state = state.write().await;
            match state.nap.phase() {
                NapPhase::Running => {
                    state.nap.tick(now);
                }
                NapPhase::Alarming => {
                    // phase checked under the same write lock
                    let _ = state.nap.check_ack_timeout(now);
                }
                _ => {}
            }
        }
    })
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server
pub async fn run_server(settings: AppSettings) -> Result<(), Box<dyn std::error::Error>> {
    let state = Arc::new(RwLock::new(AppState::new(&settings)?));
    spawn_tick_task(state.clone());

    let app = create_router(state);

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
