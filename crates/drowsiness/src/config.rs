//! Scorer configuration

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Score weights must sum to 1.0, got {0}")]
    WeightSum(f64),

    #[error("Window span must be positive: {0}")]
    NonPositiveSpan(&'static str),

    #[error("Warning threshold {warning} must be below drowsy threshold {drowsy}")]
    ThresholdOrder { warning: f64, drowsy: f64 },
}

/// Scorer configuration
///
/// The weight split and pitch policy are tunable; the defaults are the
/// reference policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerConfig {
    /// EAR warm-up interval for the initial baseline (seconds)
    pub ear_warmup_secs: f64,

    /// Observation interval for the baseline blink rate (seconds)
    pub blink_baseline_secs: f64,

    /// Rolling window span for blink counting (seconds)
    pub blink_window_secs: f64,

    /// Rolling window span for PERCLOS (seconds)
    pub perclos_window_secs: f64,

    /// Rolling window span for EAR recalibration (seconds)
    pub recal_window_secs: f64,

    /// Samples required before the recalibration window refreshes the baseline
    pub recal_min_samples: usize,

    /// PERCLOS ceiling below which an open frame counts as confidently open
    pub recal_perclos_max: f64,

    /// Longest eye closure still counted as a blink (seconds)
    pub max_blink_secs: f64,

    /// PERCLOS value mapped to a full perclos score
    pub perclos_reference: f64,

    /// Pitch deviation ignored as normal posture (degrees)
    pub pitch_deadband_deg: f64,

    /// Pitch deviation beyond the deadband mapped to a full head score (degrees)
    pub pitch_range_deg: f64,

    /// Weight of the EAR deviation sub-score
    pub w_ear: f64,

    /// Weight of the PERCLOS sub-score
    pub w_perclos: f64,

    /// Weight of the blink-drop sub-score
    pub w_blink: f64,

    /// Weight of the head-pitch sub-score
    pub w_head: f64,

    /// Composite score at or above which the state is Warning
    pub warning_threshold: f64,

    /// Composite score at or above which the state is Drowsy
    pub drowsy_threshold: f64,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        Self {
            ear_warmup_secs: 5.0,
            blink_baseline_secs: 60.0,
            blink_window_secs: 60.0,
            perclos_window_secs: 60.0,
            recal_window_secs: 60.0,
            recal_min_samples: 30,
            recal_perclos_max: 0.2,
            max_blink_secs: 0.3,
            perclos_reference: 0.4,
            pitch_deadband_deg: 15.0,
            pitch_range_deg: 20.0,
            w_ear: 0.35,
            w_perclos: 0.30,
            w_blink: 0.15,
            w_head: 0.20,
            warning_threshold: 0.4,
            drowsy_threshold: 0.7,
        }
    }
}

impl ScorerConfig {
    /// Create a sensitive config (flags drowsiness earlier)
    pub fn sensitive() -> Self {
        Self {
            warning_threshold: 0.3,
            drowsy_threshold: 0.6,
            pitch_deadband_deg: 10.0,
            ..Default::default()
        }
    }

    /// Create a relaxed config (fewer warnings)
    pub fn relaxed() -> Self {
        Self {
            warning_threshold: 0.5,
            drowsy_threshold: 0.8,
            pitch_deadband_deg: 20.0,
            ..Default::default()
        }
    }

    /// Check internal consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let weight_sum = self.w_ear + self.w_perclos + self.w_blink + self.w_head;
        if (weight_sum - 1.0).abs() > 1e-6 {
            return Err(ConfigError::WeightSum(weight_sum));
        }

        for (span, name) in [
            (self.blink_window_secs, "blink_window_secs"),
            (self.perclos_window_secs, "perclos_window_secs"),
            (self.recal_window_secs, "recal_window_secs"),
            (self.ear_warmup_secs, "ear_warmup_secs"),
            (self.blink_baseline_secs, "blink_baseline_secs"),
        ] {
            if span <= 0.0 {
                return Err(ConfigError::NonPositiveSpan(name));
            }
        }

        if self.warning_threshold >= self.drowsy_threshold {
            return Err(ConfigError::ThresholdOrder {
                warning: self.warning_threshold,
                drowsy: self.drowsy_threshold,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ScorerConfig::default().validate().is_ok());
        assert!(ScorerConfig::sensitive().validate().is_ok());
        assert!(ScorerConfig::relaxed().validate().is_ok());
    }

    #[test]
    fn test_bad_weight_sum_rejected() {
        let config = ScorerConfig {
            w_ear: 0.9,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::WeightSum(_))));
    }

    #[test]
    fn test_threshold_order_enforced() {
        let config = ScorerConfig {
            warning_threshold: 0.8,
            drowsy_threshold: 0.7,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ThresholdOrder { .. })
        ));
    }
}
