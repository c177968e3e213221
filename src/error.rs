//! Error types shared across the timer, settings and shutdown layers

use thiserror::Error;

use crate::state::TimerStatus;

/// Failures reported by the countdown engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimerError {
    /// Requested duration was zero, negative or not a number
    #[error("invalid countdown duration: {0} seconds (must be greater than 0)")]
    InvalidDuration(f64),

    /// Operation is not allowed from the current state
    #[error("cannot {action} while timer is {status}")]
    InvalidTransition {
        action: &'static str,
        status: TimerStatus,
    },

    /// Monotonic clock arithmetic failed during a tick
    #[error("timer clock fault: {0}")]
    ClockFault(String),
}

/// Failures while reading or writing the settings document
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejected user edits to the settings record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("invalid color value '{0}' (expected #RRGGBB)")]
    InvalidColor(String),

    #[error("invalid {field} value '{value}' (digits only)")]
    InvalidTimerInput { field: &'static str, value: String },
}

/// Failures of the host shutdown primitive
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShutdownError {
    #[error("failed to run shutdown command: {0}")]
    Spawn(String),

    #[error("shutdown command failed: {0}")]
    Failed(String),
}
