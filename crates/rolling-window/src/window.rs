//! Rolling Window Implementation

use std::collections::VecDeque;

/// Default window span in seconds (blink, PERCLOS, and recalibration windows)
pub const DEFAULT_SPAN_SECS: f64 = 60.0;

/// Time-bounded FIFO of timestamped values.
///
/// Entries are appended in non-decreasing timestamp order (the caller owns
/// the clock) and dropped once they fall more than `span` seconds behind
/// the eviction time. Callers evict before any size-dependent read.
#[derive(Debug, Clone)]
pub struct RollingWindow<T> {
    /// Window span in seconds
    span: f64,
    /// Entries as (timestamp, value), oldest first
    entries: VecDeque<(f64, T)>,
}

impl<T> RollingWindow<T> {
    /// Create a window covering `span` seconds
    pub fn new(span: f64) -> Self {
        Self {
            span,
            entries: VecDeque::new(),
        }
    }

    /// Create a window with the default 60-second span
    pub fn with_default_span() -> Self {
        Self::new(DEFAULT_SPAN_SECS)
    }

    /// Append a value observed at `timestamp`.
    ///
    /// Timestamps must be non-decreasing across calls; the window never
    /// reorders entries.
    pub fn push(&mut self, timestamp: f64, value: T) {
        self.entries.push_back((timestamp, value));
    }

    /// Drop every entry older than `span` seconds relative to `now`
    pub fn evict(&mut self, now: f64) {
        while let Some((ts, _)) = self.entries.front() {
            if now - ts > self.span {
                self.entries.pop_front();
            } else {
                break;
            }
        }
    }

    /// Number of entries currently held
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the window holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Window span in seconds
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Iterate over (timestamp, value) entries, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &(f64, T)> {
        self.entries.iter()
    }

    /// Iterate over values, oldest first
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|(_, v)| v)
    }

    /// Remove all entries
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl RollingWindow<f64> {
    /// Mean of the held values, or `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        let sum: f64 = self.entries.iter().map(|(_, v)| v).sum();
        Some(sum / self.entries.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_push_and_len() {
        let mut window = RollingWindow::new(10.0);

        for i in 0..5 {
            window.push(i as f64, i);
        }

        assert_eq!(window.len(), 5);
    }

    #[test]
    fn test_evict_drops_stale_entries() {
        let mut window = RollingWindow::new(10.0);

        window.push(0.0, "a");
        window.push(5.0, "b");
        window.push(12.0, "c");

        window.evict(15.0);

        // 0.0 is 15s old, 5.0 is exactly 10s old (kept), 12.0 is fresh
        assert_eq!(window.len(), 2);
        assert_eq!(window.values().copied().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_evict_boundary_is_inclusive() {
        let mut window = RollingWindow::new(60.0);

        window.push(0.0, 1.0);
        window.evict(60.0);
        assert_eq!(window.len(), 1);

        window.evict(60.1);
        assert!(window.is_empty());
    }

    #[test]
    fn test_mean() {
        let mut window = RollingWindow::new(60.0);
        assert_eq!(window.mean(), None);

        window.push(1.0, 0.2);
        window.push(2.0, 0.3);
        window.push(3.0, 0.4);

        let mean = window.mean().unwrap();
        assert!((mean - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_clear() {
        let mut window = RollingWindow::new(60.0);
        window.push(1.0, 1);
        window.clear();
        assert!(window.is_empty());
    }

    proptest! {
        /// After evict(now), every surviving entry satisfies now - ts <= span.
        #[test]
        fn prop_no_stale_entry_survives(
            span in 0.1f64..300.0,
            offsets in proptest::collection::vec(0.0f64..500.0, 1..50),
            horizon in 0.0f64..1000.0,
        ) {
            let mut window = RollingWindow::new(span);

            let mut sorted = offsets;
            sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for (i, ts) in sorted.iter().enumerate() {
                window.push(*ts, i);
            }

            let now = sorted.last().unwrap() + horizon;
            window.evict(now);

            for (ts, _) in window.iter() {
                prop_assert!(now - ts <= span);
            }
        }

        /// Insertion order is preserved through eviction.
        #[test]
        fn prop_order_preserved(
            count in 1usize..40,
            step in 0.1f64..5.0,
        ) {
            let mut window = RollingWindow::new(30.0);
            for i in 0..count {
                window.push(i as f64 * step, i);
            }
            window.evict(count as f64 * step);

            let values: Vec<usize> = window.values().copied().collect();
            let mut sorted = values.clone();
            sorted.sort_unstable();
            prop_assert_eq!(values, sorted);
        }
    }
}
