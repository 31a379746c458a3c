//! Drowsiness state classification

use serde::{Deserialize, Serialize};

/// Classified drowsiness state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrowsyState {
    #[default]
    Normal,
    Warning,
    Drowsy,
}

impl DrowsyState {
    /// Classify a composite score against the configured thresholds.
    ///
    /// The lower bound of each band is inclusive: a score exactly at
    /// `warning` is Warning, exactly at `drowsy` is Drowsy.
    pub fn classify(composite: f64, warning: f64, drowsy: f64) -> Self {
        if composite >= drowsy {
            DrowsyState::Drowsy
        } else if composite >= warning {
            DrowsyState::Warning
        } else {
            DrowsyState::Normal
        }
    }

    /// Check whether this state should drive an intervention
    pub fn is_actionable(&self) -> bool {
        !matches!(self, DrowsyState::Normal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_exact() {
        assert_eq!(DrowsyState::classify(0.399999, 0.4, 0.7), DrowsyState::Normal);
        assert_eq!(DrowsyState::classify(0.4, 0.4, 0.7), DrowsyState::Warning);
        assert_eq!(DrowsyState::classify(0.699999, 0.4, 0.7), DrowsyState::Warning);
        assert_eq!(DrowsyState::classify(0.7, 0.4, 0.7), DrowsyState::Drowsy);
    }

    #[test]
    fn test_extremes() {
        assert_eq!(DrowsyState::classify(0.0, 0.4, 0.7), DrowsyState::Normal);
        assert_eq!(DrowsyState::classify(1.0, 0.4, 0.7), DrowsyState::Drowsy);
    }

    #[test]
    fn test_actionable() {
        assert!(!DrowsyState::Normal.is_actionable());
        assert!(DrowsyState::Warning.is_actionable());
        assert!(DrowsyState::Drowsy.is_actionable());
    }
}
