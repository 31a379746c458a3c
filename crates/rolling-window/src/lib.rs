//! Time-Bounded Rolling Window
//!
//! Provides the windowed sample storage shared by the PERCLOS, blink-rate,
//! and baseline-recalibration computations.

mod window;

pub use window::RollingWindow;
