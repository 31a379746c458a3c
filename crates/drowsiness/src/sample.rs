//! Per-frame input samples

use serde::{Deserialize, Serialize};

/// Discrete eye state reported by the landmark producer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EyeState {
    Open,
    Closed,
    /// No face found in the frame
    NoFace,
    /// Face found but eye landmarks unusable
    Unknown,
}

/// One frame's observation from the landmark producer.
///
/// `ear` and `pitch` are absent when the face or the relevant landmarks
/// were not found; the scorer tolerates both without raising.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Sample {
    /// Eye aspect ratio (lower = more closed)
    pub ear: Option<f64>,
    /// Discrete eye state
    pub eye: EyeState,
    /// Head pitch in degrees, 0 = upright
    pub pitch: Option<f64>,
    /// Monotonic seconds
    pub timestamp: f64,
}

impl Sample {
    /// Convenience constructor for a fully observed frame
    pub fn new(ear: f64, eye: EyeState, pitch: f64, timestamp: f64) -> Self {
        Self {
            ear: Some(ear),
            eye,
            pitch: Some(pitch),
            timestamp,
        }
    }

    /// A frame in which no face was found
    pub fn no_face(timestamp: f64) -> Self {
        Self {
            ear: None,
            eye: EyeState::NoFace,
            pitch: None,
            timestamp,
        }
    }
}
