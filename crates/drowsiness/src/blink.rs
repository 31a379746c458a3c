//! Blink detection and rate tracking

use rolling_window::RollingWindow;

use crate::sample::EyeState;

/// Detects blinks from discrete eye-state transitions and tracks the rate
/// over a rolling window.
///
/// A blink is a Closed run ending in an Open frame whose total duration is
/// at most `max_blink_secs`; longer closures are sustained eye closure, not
/// blinks, and are left to PERCLOS.
#[derive(Debug)]
pub struct BlinkTracker {
    /// Blink timestamps
    window: RollingWindow<()>,
    /// Longest closure still counted as a blink (seconds)
    max_blink_secs: f64,
    /// Start of the current closed run, if any
    closed_since: Option<f64>,
}

impl BlinkTracker {
    pub fn new(window_secs: f64, max_blink_secs: f64) -> Self {
        Self {
            window: RollingWindow::new(window_secs),
            max_blink_secs,
            closed_since: None,
        }
    }

    /// Feed one frame's eye state; returns true when this frame completed
    /// a blink.
    pub fn observe(&mut self, eye: EyeState, now: f64) -> bool {
        let blinked = match eye {
            EyeState::Closed => {
                if self.closed_since.is_none() {
                    self.closed_since = Some(now);
                }
                false
            }
            EyeState::Open => match self.closed_since.take() {
                Some(start) if now - start <= self.max_blink_secs => {
                    self.window.push(now, ());
                    true
                }
                _ => false,
            },
            // A lost face breaks the closed run; the closure length is
            // unknowable so it counts as neither blink nor closure.
            EyeState::NoFace | EyeState::Unknown => {
                self.closed_since = None;
                false
            }
        };

        self.window.evict(now);
        blinked
    }

    /// Blinks inside the window as of the last observed frame
    pub fn count(&self) -> u32 {
        self.window.len() as u32
    }

    pub fn reset(&mut self) {
        self.window.clear();
        self.closed_since = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: f64 = 1.0 / 30.0;

    #[test]
    fn test_short_closure_counts_as_blink() {
        let mut tracker = BlinkTracker::new(60.0, 0.3);

        let mut t = 0.0;
        tracker.observe(EyeState::Open, t);
        t += FRAME;
        tracker.observe(EyeState::Closed, t);
        t += FRAME;
        tracker.observe(EyeState::Closed, t);
        t += FRAME;
        let blinked = tracker.observe(EyeState::Open, t);

        assert!(blinked);
        assert_eq!(tracker.count(), 1);
    }

    #[test]
    fn test_long_closure_is_not_a_blink() {
        let mut tracker = BlinkTracker::new(60.0, 0.3);

        tracker.observe(EyeState::Closed, 0.0);
        // Eyes stay shut for two seconds
        let mut t = 0.0;
        while t < 2.0 {
            t += FRAME;
            tracker.observe(EyeState::Closed, t);
        }
        let blinked = tracker.observe(EyeState::Open, t + FRAME);

        assert!(!blinked);
        assert_eq!(tracker.count(), 0);
    }

    #[test]
    fn test_lost_face_breaks_closed_run() {
        let mut tracker = BlinkTracker::new(60.0, 0.3);

        tracker.observe(EyeState::Closed, 0.0);
        tracker.observe(EyeState::NoFace, FRAME);
        let blinked = tracker.observe(EyeState::Open, 2.0 * FRAME);

        assert!(!blinked);
    }

    #[test]
    fn test_old_blinks_age_out() {
        let mut tracker = BlinkTracker::new(60.0, 0.3);

        tracker.observe(EyeState::Closed, 0.0);
        tracker.observe(EyeState::Open, 0.1);
        assert_eq!(tracker.count(), 1);

        // 61 seconds later the blink has left the window
        tracker.observe(EyeState::Open, 61.0);
        assert_eq!(tracker.count(), 0);
    }
}
