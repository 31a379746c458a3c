//! Session State Machines
//!
//! Two time-driven controllers built as pure state machines over an
//! explicit `now`:
//! - [`AlarmSession`]: alarm escalation with a hard activation cap
//! - [`NapSession`]: quota-limited nap countdown with deep-sleep detection
//!
//! Neither controller owns a clock or a scheduler; the caller supplies the
//! time with every operation and applies the returned transitions, so the
//! timing logic stays testable and free of presentation concerns.

pub mod alarm;
pub mod nap;

pub use alarm::{AlarmOutcome, AlarmPolicy, AlarmSession};
pub use nap::{AckOutcome, NapPhase, NapPolicy, NapSession, NapStart, TickOutcome};

use thiserror::Error;

/// Rejected-operation results.
///
/// Calling an operation from an invalid state is a contract violation
/// reported to the caller, never a panic; callers are expected to check
/// `is_allowed`/`phase` before invoking.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Alarm session is locked after {count} activations, reset required")]
    AlarmLocked { count: u32 },

    #[error("Daily nap quota exhausted ({used_seconds}s used)")]
    QuotaExhausted { used_seconds: u32 },

    #[error("{operation} is invalid while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: nap::NapPhase,
    },
}
