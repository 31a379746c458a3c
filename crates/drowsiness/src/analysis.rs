//! Scoring results

use serde::{Deserialize, Serialize};

use crate::state::DrowsyState;

/// Complete result of one scoring evaluation.
///
/// Carries the raw inputs and window statistics alongside the sub-scores so
/// the transport layer can expose them without re-deriving anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoreResult {
    /// Classified state
    pub state: DrowsyState,

    /// Weighted composite score in [0, 1]
    pub composite: f64,

    /// EAR deviation sub-score in [0, 1]
    pub ear_score: f64,

    /// PERCLOS sub-score in [0, 1]
    pub perclos_score: f64,

    /// Blink-rate drop sub-score in [0, 1]
    pub blink_drop: f64,

    /// Head-pitch sub-score in [0, 1]
    pub head_score: f64,

    /// EAR of the scored frame, if observed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ear: Option<f64>,

    /// Current EAR baseline, if calibrated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_ear: Option<f64>,

    /// Raw closed-frame ratio over the PERCLOS window
    pub perclos: f64,

    /// Blinks in the rolling blink window
    pub blink_count: u32,

    /// Head pitch of the scored frame, if observed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch: Option<f64>,
}
