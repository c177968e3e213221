//! Utility functions module
//!
//! Display formatting and process signal handling used across the application.

pub mod format;
pub mod signals;

// Re-export main functions
pub use format::format_time;
pub use signals::close_signal;
