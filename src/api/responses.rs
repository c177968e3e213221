//! API response structures

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{SettingsError, TimerError},
    overlay::OverlaySnapshot,
    settings::{DisplaySettings, LastTimerInput, Settings},
    state::TimerState,
};

/// API response structure for timer transition endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerState,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerState) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    pub fn ok(message: impl Into<String>, timer: TimerState) -> Self {
        Self::new("ok".to_string(), message.into(), timer)
    }
}

/// Body returned with every rejected request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: error.into(),
            timestamp: Utc::now(),
        }
    }
}

/// HTTP status for a rejected timer operation
pub fn timer_error_status(error: &TimerError) -> StatusCode {
    match error {
        TimerError::InvalidDuration(_) => StatusCode::BAD_REQUEST,
        TimerError::InvalidTransition { .. } => StatusCode::CONFLICT,
        TimerError::ClockFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// HTTP status for a rejected settings edit
pub fn settings_error_status(error: &SettingsError) -> StatusCode {
    match error {
        SettingsError::InvalidColor(_) | SettingsError::InvalidTimerInput { .. } => {
            StatusCode::BAD_REQUEST
        }
    }
}

/// Full status including the overlay and session line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerState,
    pub remaining_display: String,
    pub status_message: String,
    pub errors: Vec<String>,
    pub overlay: Option<OverlaySnapshot>,
    pub persist: bool,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub persist: bool,
    pub settings: Settings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayResponse {
    pub display: DisplaySettings,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerInputResponse {
    pub last_timer: LastTimerInput,
    pub total_seconds: u64,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
