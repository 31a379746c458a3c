//! Nap quota and countdown session
//!
//! Enforces a rolling daily usage quota, runs the active countdown, and
//! detects an unacknowledged wake alarm (deep sleep) via a timeout. The
//! 1-second cadence belongs to the caller's scheduler; `tick` consumes
//! exactly one second per invocation.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use event_log::{events, EventSink};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::SessionError;

/// Nap session policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NapPolicy {
    /// Daily usage quota in seconds
    pub max_daily_seconds: u32,
    /// Seconds the subject has to acknowledge the wake alarm
    pub ack_timeout_secs: i64,
}

impl Default for NapPolicy {
    fn default() -> Self {
        Self {
            max_daily_seconds: 30 * 60,
            ack_timeout_secs: 60,
        }
    }
}

/// Nap session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NapPhase {
    Idle,
    Running,
    Alarming,
    /// Daily quota exhausted; clears on the next calendar day
    LockedOut,
}

/// Result of a granted start request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NapStart {
    /// Seconds actually granted (requested, clamped to the remaining quota)
    pub granted_seconds: u32,
    pub requested_seconds: u32,
    /// Whether the grant was clamped below the request
    pub clamped: bool,
}

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing to count down
    Noop,
    /// Countdown continues
    CountingDown { remaining_seconds: u32 },
    /// Countdown finished; the wake alarm is now sounding
    AlarmStarted,
}

/// Result of an acknowledge-deadline check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckOutcome {
    /// Deadline not reached yet
    Waiting,
    /// No reaction within the timeout: subject is in deep sleep
    DeepSleep,
}

/// Quota-limited nap timer with automatic deep-sleep detection.
pub struct NapSession {
    policy: NapPolicy,
    phase: NapPhase,
    /// Calendar date the usage counter belongs to
    date: Option<NaiveDate>,
    used_seconds_today: u32,
    /// Seconds granted at the last start
    granted_seconds: u32,
    remaining_seconds: u32,
    ack_deadline: Option<DateTime<Utc>>,
    sink: Arc<dyn EventSink>,
}

impl NapSession {
    pub fn new(policy: NapPolicy, sink: Arc<dyn EventSink>) -> Self {
        Self {
            policy,
            phase: NapPhase::Idle,
            date: None,
            used_seconds_today: 0,
            granted_seconds: 0,
            remaining_seconds: 0,
            ack_deadline: None,
            sink,
        }
    }

    pub fn phase(&self) -> NapPhase {
        self.phase
    }

    /// Seconds left in the active countdown
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Seconds of quota left for the calendar day of `now`
    pub fn remaining_quota(&self, now: DateTime<Utc>) -> u32 {
        if self.date != Some(now.date_naive()) {
            return self.policy.max_daily_seconds;
        }
        self.policy
            .max_daily_seconds
            .saturating_sub(self.used_seconds_today)
    }

    /// Seconds already used on the calendar day of `now`
    pub fn used_seconds_today(&self, now: DateTime<Utc>) -> u32 {
        if self.date != Some(now.date_naive()) {
            0
        } else {
            self.used_seconds_today
        }
    }

    /// Start a nap countdown.
    ///
    /// The day rollover is applied before any quota check. A request past
    /// the remaining quota is clamped, not rejected; only an exhausted
    /// quota fails. Rejected while a countdown or wake alarm is active.
    pub fn request_start(
        &mut self,
        requested_seconds: u32,
        now: DateTime<Utc>,
    ) -> Result<NapStart, SessionError> {
        self.roll_over(now);

        if matches!(self.phase, NapPhase::Running | NapPhase::Alarming) {
            warn!(phase = ?self.phase, "nap start rejected: session busy");
            return Err(SessionError::InvalidPhase {
                operation: "request_start",
                phase: self.phase,
            });
        }

        let quota = self
            .policy
            .max_daily_seconds
            .saturating_sub(self.used_seconds_today);
        if quota == 0 {
            self.phase = NapPhase::LockedOut;
            info!(used = self.used_seconds_today, "nap start refused: quota exhausted");
            return Err(SessionError::QuotaExhausted {
                used_seconds: self.used_seconds_today,
            });
        }

        let granted = requested_seconds.min(quota);
        self.phase = NapPhase::Running;
        self.granted_seconds = granted;
        self.remaining_seconds = granted;
        self.ack_deadline = None;

        info!(granted, requested_seconds, "nap timer started");
        self.sink.emit(
            events::NAP_TIMER_START,
            json!({
                "duration_seconds": granted,
                "requested_seconds": requested_seconds,
            }),
        );

        Ok(NapStart {
            granted_seconds: granted,
            requested_seconds,
            clamped: granted < requested_seconds,
        })
    }

    /// Consume one second of countdown. Called at 1 Hz while running; a
    /// no-op in any other phase, so a persistent scheduler cannot corrupt
    /// state after cancellation.
    pub fn tick(&mut self, now: DateTime<Utc>) -> TickOutcome {
        if self.phase != NapPhase::Running {
            return TickOutcome::Noop;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return TickOutcome::CountingDown {
                remaining_seconds: self.remaining_seconds,
            };
        }

        // Countdown done: sound the wake alarm and arm the ack deadline
        self.phase = NapPhase::Alarming;
        self.used_seconds_today += self.granted_seconds;
        self.ack_deadline = Some(now + Duration::seconds(self.policy.ack_timeout_secs));

        info!(
            used = self.used_seconds_today,
            "nap complete, waiting for acknowledgement"
        );
        self.sink.emit(
            events::NAP_TIMER_COMPLETE,
            json!({ "duration_seconds": self.granted_seconds }),
        );

        TickOutcome::AlarmStarted
    }

    /// The subject reacted to the wake alarm (eyes confirmed open).
    pub fn acknowledge(&mut self, _now: DateTime<Utc>) -> Result<(), SessionError> {
        if self.phase != NapPhase::Alarming {
            return Err(SessionError::InvalidPhase {
                operation: "acknowledge",
                phase: self.phase,
            });
        }

        self.phase = NapPhase::Idle;
        self.ack_deadline = None;
        info!("wake alarm acknowledged");
        Ok(())
    }

    /// Check whether the wake alarm has gone unacknowledged past the
    /// deadline; declares deep sleep and returns to idle when it has. The
    /// forced non-sleep-mode action belongs to the event consumer.
    pub fn check_ack_timeout(&mut self, now: DateTime<Utc>) -> Result<AckOutcome, SessionError> {
        if self.phase != NapPhase::Alarming {
            return Err(SessionError::InvalidPhase {
                operation: "check_ack_timeout",
                phase: self.phase,
            });
        }

        match self.ack_deadline {
            Some(deadline) if now >= deadline => {
                self.phase = NapPhase::Idle;
                self.ack_deadline = None;
                warn!("no reaction to wake alarm, deep sleep detected");
                self.sink.emit(
                    events::DEEP_SLEEP_DETECTED,
                    json!({ "reason": "alarm_not_acknowledged" }),
                );
                Ok(AckOutcome::DeepSleep)
            }
            _ => Ok(AckOutcome::Waiting),
        }
    }

    /// Stop a running countdown; the elapsed portion counts against the
    /// daily quota.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> Result<u32, SessionError> {
        if self.phase != NapPhase::Running {
            return Err(SessionError::InvalidPhase {
                operation: "cancel",
                phase: self.phase,
            });
        }

        let elapsed = self.granted_seconds - self.remaining_seconds;
        self.used_seconds_today += elapsed;
        self.phase = NapPhase::Idle;
        self.remaining_seconds = 0;

        info!(elapsed, used = self.used_seconds_today, "nap timer cancelled");
        self.sink.emit(
            events::NAP_TIMER_CANCEL,
            json!({
                "elapsed_seconds": elapsed,
                "remaining_quota": self.remaining_quota(now),
            }),
        );

        Ok(elapsed)
    }

    fn roll_over(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        if self.date != Some(today) {
            if self.date.is_some() {
                info!(%today, "daily nap quota reset");
            }
            self.date = Some(today);
            self.used_seconds_today = 0;
            if self.phase == NapPhase::LockedOut {
                self.phase = NapPhase::Idle;
            }
        }
    }
}
