//! Countdown engine module
//!
//! The timer state machine and the clocks it can be driven by.

pub mod clock;
pub mod engine;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::{TickOutcome, TimerEngine};
