//! Structured Event Log
//!
//! Session controllers and the scoring service report what happened through
//! an [`EventSink`]; consumers (UI, notification layer) decide what to do
//! with it. Emission is fire-and-forget: a failing sink never affects the
//! correctness of the component that emitted.

mod record;
mod sink;

pub use record::EventRecord;
pub use sink::{EventSink, MemorySink};

/// Event type names shared across components
pub mod events {
    pub const ALARM_TRIGGERED: &str = "ALARM_TRIGGERED";
    pub const SLEEP_RECOMMENDED: &str = "SLEEP_RECOMMENDED";
    pub const ALARM_RESET: &str = "ALARM_RESET";
    pub const NAP_TIMER_START: &str = "NAP_TIMER_START";
    pub const NAP_TIMER_COMPLETE: &str = "NAP_TIMER_COMPLETE";
    pub const NAP_TIMER_CANCEL: &str = "NAP_TIMER_CANCEL";
    pub const DEEP_SLEEP_DETECTED: &str = "DEEP_SLEEP_DETECTED";
    pub const DROWSINESS_CHANGE: &str = "DROWSINESS_CHANGE";
    pub const SCREEN_ENTER: &str = "SCREEN_ENTER";
}
