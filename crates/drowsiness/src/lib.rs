//! Drowsiness Scoring
//!
//! Real-time drowsiness estimation from per-frame physiological signals:
//! - EAR deviation from a calibrated baseline
//! - PERCLOS (eye-closure ratio over a rolling window)
//! - Blink-rate drop versus the calibrated rate
//! - Head-pitch deviation from upright

pub mod analysis;
pub mod baseline;
pub mod blink;
pub mod config;
pub mod sample;
pub mod state;

pub use analysis::ScoreResult;
pub use baseline::{BaselineCalibrator, BaselineProfile};
pub use blink::BlinkTracker;
pub use config::{ConfigError, ScorerConfig};
pub use sample::{EyeState, Sample};
pub use state::DrowsyState;

use rolling_window::RollingWindow;
use tracing::debug;

/// Multi-factor drowsiness scorer.
///
/// Produces one [`ScoreResult`] per incoming [`Sample`]; a pure function of
/// the sample and the accumulated window history, with no side effects
/// beyond updating those windows.
pub struct DrowsinessScorer {
    config: ScorerConfig,
    baseline: BaselineCalibrator,
    blinks: BlinkTracker,
    /// (timestamp, eye state) for PERCLOS
    frame_states: RollingWindow<EyeState>,
}

impl DrowsinessScorer {
    pub fn new(config: ScorerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            baseline: BaselineCalibrator::new(&config),
            blinks: BlinkTracker::new(config.blink_window_secs, config.max_blink_secs),
            frame_states: RollingWindow::new(config.perclos_window_secs),
            config,
        })
    }

    /// Score a single frame sample.
    ///
    /// Caller guarantees non-decreasing timestamps across calls. Missing
    /// EAR/pitch and NoFace/Unknown states contribute a neutral zero to
    /// their sub-scores; prior window state is kept intact.
    pub fn update(&mut self, sample: &Sample) -> ScoreResult {
        let now = sample.timestamp;

        if self.blinks.observe(sample.eye, now) {
            self.baseline.record_blink();
        }
        let blink_count = self.blinks.count();

        self.baseline.observe_ear(sample.ear, now);

        self.frame_states.push(now, sample.eye);
        self.frame_states.evict(now);
        let total = self.frame_states.len();
        let closed = self
            .frame_states
            .values()
            .filter(|s| **s == EyeState::Closed)
            .count();
        let perclos = if total == 0 {
            0.0
        } else {
            closed as f64 / total as f64
        };
        let perclos_score = (perclos / self.config.perclos_reference).clamp(0.0, 1.0);

        // Frames judged confidently open keep the EAR baseline adaptive
        if sample.eye == EyeState::Open && perclos < self.config.recal_perclos_max {
            if let Some(ear) = sample.ear {
                self.baseline.observe_confident_open(ear, now);
            }
        }

        let profile = self.baseline.profile();

        let ear_score = match (profile.avg_ear, sample.ear) {
            (Some(avg), Some(ear)) if avg > 0.0 => ((avg - ear) / avg).clamp(0.0, 1.0),
            _ => 0.0,
        };

        let blink_drop = match profile.blink_rate {
            Some(rate) if rate > 0 => {
                ((rate as f64 - blink_count as f64) / rate as f64).clamp(0.0, 1.0)
            }
            _ => 0.0,
        };

        let head_score = match sample.pitch {
            Some(pitch) => ((pitch.abs() - self.config.pitch_deadband_deg)
                / self.config.pitch_range_deg)
                .clamp(0.0, 1.0),
            None => 0.0,
        };

        let composite = (self.config.w_ear * ear_score
            + self.config.w_perclos * perclos_score
            + self.config.w_blink * blink_drop
            + self.config.w_head * head_score)
            .clamp(0.0, 1.0);

        let state = DrowsyState::classify(
            composite,
            self.config.warning_threshold,
            self.config.drowsy_threshold,
        );

        debug!(
            composite,
            ear_score, perclos_score, blink_drop, head_score, ?state,
            "frame scored"
        );

        ScoreResult {
            state,
            composite,
            ear_score,
            perclos_score,
            blink_drop,
            head_score,
            ear: sample.ear,
            avg_ear: profile.avg_ear,
            perclos,
            blink_count,
            pitch: sample.pitch,
        }
    }

    /// Current baseline profile
    pub fn baseline(&self) -> &BaselineProfile {
        self.baseline.profile()
    }

    /// Scorer configuration
    pub fn config(&self) -> &ScorerConfig {
        &self.config
    }

    /// Discard all windows and baselines (new session)
    pub fn reset(&mut self) {
        self.baseline.reset();
        self.blinks.reset();
        self.frame_states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRAME: f64 = 1.0 / 30.0;

    fn scorer() -> DrowsinessScorer {
        DrowsinessScorer::new(ScorerConfig::default()).unwrap()
    }

    /// Drive open-eyed upright frames from t=0 to establish baselines.
    fn warm_up(scorer: &mut DrowsinessScorer, until: f64) -> f64 {
        let mut t = 0.0;
        while t < until {
            scorer.update(&Sample::new(0.30, EyeState::Open, 0.0, t));
            t += FRAME;
        }
        t
    }

    #[test]
    fn test_alert_subject_scores_normal() {
        let mut s = scorer();
        let t = warm_up(&mut s, 6.0);

        let result = s.update(&Sample::new(0.30, EyeState::Open, 0.0, t));
        assert_eq!(result.state, DrowsyState::Normal);
        assert!(result.composite < 0.4);
        assert!(result.avg_ear.is_some());
    }

    #[test]
    fn test_no_face_contributes_nothing() {
        let mut s = scorer();
        let t = warm_up(&mut s, 6.0);

        let result = s.update(&Sample::no_face(t));
        assert_eq!(result.ear_score, 0.0);
        assert_eq!(result.head_score, 0.0);
        assert!(result.composite <= 1.0);
    }

    #[test]
    fn test_uncalibrated_ear_scores_zero() {
        let mut s = scorer();

        // First frames, nothing calibrated yet
        let result = s.update(&Sample::new(0.10, EyeState::Open, 0.0, 0.0));
        assert_eq!(result.ear_score, 0.0);
        assert_eq!(result.blink_drop, 0.0);
    }

    #[test]
    fn test_low_ear_raises_ear_score() {
        let mut s = scorer();
        let t = warm_up(&mut s, 6.0);

        let result = s.update(&Sample::new(0.15, EyeState::Open, 0.0, t));
        // (0.30 - 0.15) / 0.30 = 0.5
        assert!((result.ear_score - 0.5).abs() < 0.05);
    }

    #[test]
    fn test_sustained_closure_drives_perclos() {
        let mut s = scorer();
        // Long enough to resolve the blink baseline too
        let mut t = warm_up(&mut s, 61.0);

        // Eyes closed for a long stretch
        let mut last = ScoreResult::default();
        for _ in 0..(30.0 / FRAME) as usize {
            last = s.update(&Sample::new(0.05, EyeState::Closed, 0.0, t));
            t += FRAME;
        }

        assert!(last.perclos > 0.4);
        assert_eq!(last.perclos_score, 1.0);
        assert_eq!(last.state, DrowsyState::Drowsy);
    }

    #[test]
    fn test_head_pitch_deadband() {
        let mut s = scorer();
        let t = warm_up(&mut s, 6.0);

        let upright = s.update(&Sample::new(0.30, EyeState::Open, 10.0, t));
        assert_eq!(upright.head_score, 0.0);

        let dropped = s.update(&Sample::new(0.30, EyeState::Open, -35.0, t + FRAME));
        // (35 - 15) / 20 = 1.0
        assert_eq!(dropped.head_score, 1.0);
    }

    #[test]
    fn test_reset_clears_history() {
        let mut s = scorer();
        let t = warm_up(&mut s, 6.0);
        assert!(s.baseline().calibrated);

        s.reset();
        assert!(!s.baseline().calibrated);

        let result = s.update(&Sample::new(0.30, EyeState::Open, 0.0, t + 1.0));
        assert_eq!(result.ear_score, 0.0);
        assert_eq!(result.blink_count, 0);
    }

    proptest! {
        /// Composite stays in [0, 1] for arbitrary finite input streams.
        #[test]
        fn prop_composite_in_unit_interval(
            frames in proptest::collection::vec(
                (
                    proptest::option::of(0.0f64..1.0),
                    0u8..4,
                    proptest::option::of(-90.0f64..90.0),
                ),
                1..200,
            )
        ) {
            let mut s = scorer();
            for (i, (ear, eye, pitch)) in frames.iter().enumerate() {
                let eye = match eye {
                    0 => EyeState::Open,
                    1 => EyeState::Closed,
                    2 => EyeState::NoFace,
                    _ => EyeState::Unknown,
                };
                let sample = Sample {
                    ear: *ear,
                    eye,
                    pitch: *pitch,
                    timestamp: i as f64 * FRAME,
                };
                let result = s.update(&sample);
                prop_assert!((0.0..=1.0).contains(&result.composite));
                prop_assert!((0.0..=1.0).contains(&result.ear_score));
                prop_assert!((0.0..=1.0).contains(&result.perclos_score));
                prop_assert!((0.0..=1.0).contains(&result.blink_drop));
                prop_assert!((0.0..=1.0).contains(&result.head_score));
            }
        }
    }
}
