//! Alarm escalation session

use std::sync::Arc;

use event_log::{events, EventSink};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::SessionError;

/// Alarm escalation policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmPolicy {
    /// Activations allowed before the session locks
    pub max_count: u32,
}

impl Default for AlarmPolicy {
    fn default() -> Self {
        Self { max_count: 4 }
    }
}

/// Result of a successful trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AlarmOutcome {
    /// Alarm fired
    Triggered { count: u32 },
    /// Cap exceeded: the session is now locked and the subject should stop
    /// resisting sleep
    SleepRecommended { count: u32 },
}

/// Counts alarm activations and locks further escalation past the cap.
pub struct AlarmSession {
    policy: AlarmPolicy,
    count: u32,
    locked: bool,
    sink: Arc<dyn EventSink>,
}

impl AlarmSession {
    pub fn new(policy: AlarmPolicy, sink: Arc<dyn EventSink>) -> Self {
        Self {
            policy,
            count: 0,
            locked: false,
            sink,
        }
    }

    /// Whether trigger() is currently permitted
    pub fn is_allowed(&self) -> bool {
        !self.locked
    }

    /// Activations so far in this session
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Fire the alarm once.
    ///
    /// Rejected while locked; callers check [`is_allowed`](Self::is_allowed)
    /// first. The increment that pushes the count past the cap locks the
    /// session and reports [`AlarmOutcome::SleepRecommended`] instead of a
    /// normal activation.
    pub fn trigger(&mut self) -> Result<AlarmOutcome, SessionError> {
        if self.locked {
            warn!(count = self.count, "alarm trigger rejected: session locked");
            return Err(SessionError::AlarmLocked { count: self.count });
        }

        self.count += 1;

        if self.count <= self.policy.max_count {
            info!(count = self.count, "alarm triggered");
            self.sink
                .emit(events::ALARM_TRIGGERED, json!({ "count": self.count }));
            Ok(AlarmOutcome::Triggered { count: self.count })
        } else {
            self.locked = true;
            info!(count = self.count, "alarm cap exceeded, recommending sleep");
            self.sink
                .emit(events::SLEEP_RECOMMENDED, json!({ "count": self.count }));
            Ok(AlarmOutcome::SleepRecommended { count: self.count })
        }
    }

    /// Return to the unlocked state with a zero count. Idempotent.
    pub fn reset(&mut self) {
        self.count = 0;
        self.locked = false;
        info!("alarm session reset");
        self.sink.emit(events::ALARM_RESET, json!({}));
    }
}
