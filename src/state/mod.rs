//! State management module
//!
//! This module contains the shared application state, the timer snapshot
//! types and the messages exchanged between tasks.

pub mod app_state;
pub mod events;
pub mod session_state;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use events::{DisplayEvent, TimerControl};
pub use session_state::SessionState;
pub use timer_state::{TimerState, TimerStatus};
