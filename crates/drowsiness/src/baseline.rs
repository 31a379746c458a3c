//! Baseline calibration
//!
//! Establishes the per-session "alert" reference values: average EAR and
//! blink rate. The EAR baseline comes from a short warm-up and is then
//! refreshed continuously from confidently open frames, so lighting and
//! posture drift do not poison the deviation score.

use rolling_window::RollingWindow;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScorerConfig;

/// Per-session reference values established during warm-up
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaselineProfile {
    /// Average EAR over the warm-up interval (or last recalibration)
    pub avg_ear: Option<f64>,
    /// Blinks observed during the baseline interval, floored to 1
    pub blink_rate: Option<u32>,
    /// Whether an EAR baseline has been established
    pub calibrated: bool,
}

/// Accumulates warm-up observations and resolves them into a
/// [`BaselineProfile`].
#[derive(Debug)]
pub struct BaselineCalibrator {
    /// Timestamp of the first observed frame
    started_at: Option<f64>,
    /// EAR samples collected during warm-up
    warmup_ears: Vec<f64>,
    /// Warm-up interval has expired
    ear_resolved: bool,
    /// Blinks observed during the blink baseline interval
    baseline_blinks: u32,
    blink_resolved: bool,
    /// Confidently open EARs for continuous recalibration
    recal_window: RollingWindow<f64>,
    profile: BaselineProfile,

    ear_warmup_secs: f64,
    blink_baseline_secs: f64,
    recal_min_samples: usize,
}

impl BaselineCalibrator {
    pub fn new(config: &ScorerConfig) -> Self {
        Self {
            started_at: None,
            warmup_ears: Vec::new(),
            ear_resolved: false,
            baseline_blinks: 0,
            blink_resolved: false,
            recal_window: RollingWindow::new(config.recal_window_secs),
            profile: BaselineProfile::default(),
            ear_warmup_secs: config.ear_warmup_secs,
            blink_baseline_secs: config.blink_baseline_secs,
            recal_min_samples: config.recal_min_samples,
        }
    }

    /// Feed one frame's EAR observation and resolve any expired intervals.
    pub fn observe_ear(&mut self, ear: Option<f64>, now: f64) {
        let started = *self.started_at.get_or_insert(now);

        if !self.ear_resolved {
            if now - started < self.ear_warmup_secs {
                if let Some(value) = ear {
                    self.warmup_ears.push(value);
                }
            } else {
                self.resolve_ear_warmup();
            }
        }

        if !self.blink_resolved && now - started >= self.blink_baseline_secs {
            let rate = self.baseline_blinks.max(1);
            info!(blinks = self.baseline_blinks, rate, "blink baseline established");
            self.profile.blink_rate = Some(rate);
            self.blink_resolved = true;
        }
    }

    /// Count a blink toward the baseline while the interval is open.
    pub fn record_blink(&mut self) {
        if !self.blink_resolved {
            self.baseline_blinks += 1;
        }
    }

    /// Feed a confidently open frame (state Open, low PERCLOS) into the
    /// recalibration window; refreshes the EAR baseline once the window
    /// holds enough samples.
    pub fn observe_confident_open(&mut self, ear: f64, now: f64) {
        self.recal_window.push(now, ear);
        self.recal_window.evict(now);

        if self.recal_window.len() >= self.recal_min_samples {
            if let Some(mean) = self.recal_window.mean() {
                debug!(avg_ear = mean, samples = self.recal_window.len(), "EAR baseline refreshed");
                self.profile.avg_ear = Some(mean);
                self.profile.calibrated = true;
            }
        }
    }

    /// Reference profile as currently established
    pub fn profile(&self) -> &BaselineProfile {
        &self.profile
    }

    /// Discard all baselines and restart warm-up at the next frame
    pub fn reset(&mut self) {
        self.started_at = None;
        self.warmup_ears.clear();
        self.ear_resolved = false;
        self.baseline_blinks = 0;
        self.blink_resolved = false;
        self.recal_window.clear();
        self.profile = BaselineProfile::default();
    }

    fn resolve_ear_warmup(&mut self) {
        self.ear_resolved = true;

        if self.warmup_ears.is_empty() {
            // No face for the entire warm-up: stay uncalibrated, the
            // recalibration window takes over once a face appears.
            warn!("EAR warm-up expired without samples, baseline not calibrated");
            return;
        }

        let mean = self.warmup_ears.iter().sum::<f64>() / self.warmup_ears.len() as f64;
        info!(avg_ear = mean, samples = self.warmup_ears.len(), "EAR baseline calibrated");
        self.profile.avg_ear = Some(mean);
        self.profile.calibrated = true;
        self.warmup_ears.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calibrator() -> BaselineCalibrator {
        BaselineCalibrator::new(&ScorerConfig::default())
    }

    #[test]
    fn test_ear_warmup_resolves_to_mean() {
        let mut cal = calibrator();

        cal.observe_ear(Some(0.30), 0.0);
        cal.observe_ear(Some(0.32), 1.0);
        cal.observe_ear(Some(0.28), 2.0);
        assert!(!cal.profile().calibrated);

        // Past the 5s warm-up
        cal.observe_ear(Some(0.50), 5.5);

        let profile = cal.profile();
        assert!(profile.calibrated);
        assert!((profile.avg_ear.unwrap() - 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_no_face_warmup_stays_uncalibrated() {
        let mut cal = calibrator();

        cal.observe_ear(None, 0.0);
        cal.observe_ear(None, 3.0);
        cal.observe_ear(None, 6.0);

        let profile = cal.profile();
        assert!(!profile.calibrated);
        assert_eq!(profile.avg_ear, None);
    }

    #[test]
    fn test_blink_baseline_floors_to_one() {
        let mut cal = calibrator();

        cal.observe_ear(Some(0.3), 0.0);
        // No blinks recorded during the whole interval
        cal.observe_ear(Some(0.3), 61.0);

        assert_eq!(cal.profile().blink_rate, Some(1));
    }

    #[test]
    fn test_blink_baseline_counts_warmup_blinks() {
        let mut cal = calibrator();

        cal.observe_ear(Some(0.3), 0.0);
        for _ in 0..12 {
            cal.record_blink();
        }
        cal.observe_ear(Some(0.3), 60.0);

        assert_eq!(cal.profile().blink_rate, Some(12));

        // Blinks after resolution do not move the baseline
        cal.record_blink();
        assert_eq!(cal.profile().blink_rate, Some(12));
    }

    #[test]
    fn test_recalibration_refreshes_avg_ear() {
        let mut cal = calibrator();

        cal.observe_ear(Some(0.30), 0.0);
        cal.observe_ear(Some(0.30), 6.0);
        assert!((cal.profile().avg_ear.unwrap() - 0.30).abs() < 1e-9);

        // 30 confidently open frames at a higher EAR
        for i in 0..30 {
            cal.observe_confident_open(0.36, 10.0 + i as f64 * 0.1);
        }

        assert!((cal.profile().avg_ear.unwrap() - 0.36).abs() < 1e-9);
    }

    #[test]
    fn test_recalibration_rescues_failed_warmup() {
        let mut cal = calibrator();

        cal.observe_ear(None, 0.0);
        cal.observe_ear(None, 6.0);
        assert!(!cal.profile().calibrated);

        for i in 0..30 {
            cal.observe_confident_open(0.33, 10.0 + i as f64 * 0.1);
        }

        assert!(cal.profile().calibrated);
        assert!((cal.profile().avg_ear.unwrap() - 0.33).abs() < 1e-9);
    }

    #[test]
    fn test_reset_restarts_warmup() {
        let mut cal = calibrator();

        cal.observe_ear(Some(0.3), 0.0);
        cal.observe_ear(Some(0.3), 6.0);
        assert!(cal.profile().calibrated);

        cal.reset();
        assert!(!cal.profile().calibrated);

        // Warm-up restarts from the next observed frame
        cal.observe_ear(Some(0.4), 100.0);
        cal.observe_ear(Some(0.4), 106.0);
        assert!((cal.profile().avg_ear.unwrap() - 0.4).abs() < 1e-9);
    }
}
