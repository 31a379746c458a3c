//! Event sink implementations

use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::{info, warn};

use crate::record::EventRecord;

/// Maximum records the in-memory sink retains
pub const DEFAULT_RETENTION: usize = 100;

/// Receiver of structured events.
///
/// Implementations must be fire-and-forget: they swallow their own failures
/// and never propagate them to the emitting component.
pub trait EventSink: Send + Sync {
    fn emit(&self, event_type: &str, data: serde_json::Value);
}

/// Bounded in-memory sink keeping the most recent records, newest first.
///
/// Every emission is also forwarded to the tracing subscriber, so the
/// buffer serves inspection and the log stream serves operations.
pub struct MemorySink {
    records: Mutex<VecDeque<EventRecord>>,
    retention: usize,
}

impl MemorySink {
    pub fn new(retention: usize) -> Self {
        Self {
            records: Mutex::new(VecDeque::with_capacity(retention)),
            retention,
        }
    }

    /// All retained records, newest first
    pub fn all(&self) -> Vec<EventRecord> {
        match self.records.lock() {
            Ok(records) => records.iter().cloned().collect(),
            Err(e) => {
                warn!("event log lock poisoned: {}", e);
                Vec::new()
            }
        }
    }

    /// Retained records of one type, newest first
    pub fn by_type(&self, event_type: &str) -> Vec<EventRecord> {
        self.all()
            .into_iter()
            .filter(|r| r.event_type == event_type)
            .collect()
    }

    /// Number of retained records
    pub fn len(&self) -> usize {
        self.records.lock().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all retained records
    pub fn clear(&self) {
        if let Ok(mut records) = self.records.lock() {
            records.clear();
        }
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(DEFAULT_RETENTION)
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event_type: &str, data: serde_json::Value) {
        info!(event_type, %data, "event");

        let Ok(mut records) = self.records.lock() else {
            warn!(event_type, "event dropped: log lock poisoned");
            return;
        };

        while records.len() >= self.retention {
            records.pop_back();
        }
        records.push_front(EventRecord::new(event_type, data));
    }
}
