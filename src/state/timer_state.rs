//! Timer state structures shared with observers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of one countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
    Canceled,
}

impl TimerStatus {
    /// Running or paused, i.e. a countdown is in progress
    pub fn is_active(self) -> bool {
        matches!(self, TimerStatus::Running | TimerStatus::Paused)
    }
}

impl fmt::Display for TimerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Running => "running",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
            TimerStatus::Canceled => "canceled",
        };
        f.write_str(name)
    }
}

/// Point-in-time view of the countdown, published to observers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub status: TimerStatus,
    pub remaining_seconds: f64,
    pub total_seconds: f64,
    pub warning_fired: bool,
}

impl TimerState {
    /// Create an idle timer state
    pub fn new() -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_seconds: 0.0,
            total_seconds: 0.0,
            warning_fired: false,
        }
    }

    /// Check if a countdown is in progress
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Remaining seconds while a countdown is in progress
    pub fn remaining_seconds(&self) -> Option<f64> {
        if self.is_active() {
            Some(self.remaining_seconds)
        } else {
            None
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}
