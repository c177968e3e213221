//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::{
    overlay::PointerEvent,
    settings::{DisplayPatch, LastTimerInput, TimerField},
    state::AppState,
    utils::format_time,
};
use super::responses::{
    settings_error_status, timer_error_status, ApiResponse, DisplayResponse, ErrorResponse,
    HealthResponse, SettingsResponse, StatusResponse, TimerInputResponse,
};

/// Rejection carried back to the client
pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn reject(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorResponse::new(message)))
}

/// Body of PUT /settings/timer-input: raw text typed into one field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerInputUpdate {
    pub field: TimerField,
    pub value: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistUpdate {
    pub enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VisibilityUpdate {
    pub visible: bool,
}

/// Read the requested duration. Only an empty body falls back to the stored
/// input; anything unparsable is rejected.
fn requested_input(body: &[u8]) -> Result<Option<LastTimerInput>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice(body).map(Some).map_err(|e| {
        reject(
            StatusCode::BAD_REQUEST,
            format!("invalid countdown duration: {}", e),
        )
    })
}

/// Handle POST /timer/start - Start a countdown from the body or the stored input
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ApiResponse>, ApiError> {
    let input = match requested_input(&body) {
        Ok(input) => input,
        Err(rejection) => {
            warn!("Rejected start request: {}", rejection.1.error);
            return Err(rejection);
        }
    };

    match state.start_timer(input) {
        Ok(timer) => {
            info!("Start endpoint called - countdown of {}s started", timer.total_seconds);
            Ok(Json(ApiResponse::ok(
                format!("Timer started for {}", format_time(timer.total_seconds)),
                timer,
            )))
        }
        Err(e) => {
            warn!("Failed to start timer: {}", e);
            Err(reject(timer_error_status(&e), e.to_string()))
        }
    }
}

/// Handle POST /timer/pause
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    match state.pause_timer() {
        Ok(timer) => {
            info!("Pause endpoint called - {:.0}s remaining", timer.remaining_seconds);
            Ok(Json(ApiResponse::ok("Timer paused", timer)))
        }
        Err(e) => {
            warn!("Failed to pause timer: {}", e);
            Err(reject(timer_error_status(&e), e.to_string()))
        }
    }
}

/// Handle POST /timer/resume
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, ApiError> {
    match state.resume_timer() {
        Ok(timer) => {
            info!("Resume endpoint called - {:.0}s remaining", timer.remaining_seconds);
            Ok(Json(ApiResponse::ok("Timer resumed", timer)))
        }
        Err(e) => {
            warn!("Failed to resume timer: {}", e);
            Err(reject(timer_error_status(&e), e.to_string()))
        }
    }
}

/// Handle POST /timer/cancel - Always succeeds
pub async fn cancel_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.cancel_timer();
    info!("Cancel endpoint called");
    Json(ApiResponse::ok("Timer canceled", timer))
}

/// Handle POST /warning/cancel - The warning notice's cancel-shutdown action
pub async fn warning_cancel_handler(State(state): State<Arc<AppState>>) -> Json<ApiResponse> {
    let timer = state.cancel_from_warning();
    info!("Shutdown canceled from the warning notice");
    Json(ApiResponse::ok("Shutdown canceled", timer))
}

/// Handle GET /status - Return timer, overlay and session status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let timer = state.get_timer_state();
    let session = state.get_session_state();
    let (_, persist) = state.get_settings();
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        remaining_display: format_time(timer.remaining_seconds),
        timer,
        status_message: session.status_message,
        errors: session.errors,
        overlay: state.overlay_snapshot(),
        persist,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /settings
pub async fn settings_handler(State(state): State<Arc<AppState>>) -> Json<SettingsResponse> {
    let (settings, persist) = state.get_settings();
    Json(SettingsResponse { persist, settings })
}

/// Handle PUT /settings/display - Partial update of the overlay appearance
pub async fn display_handler(
    State(state): State<Arc<AppState>>,
    Json(patch): Json<DisplayPatch>,
) -> Result<Json<DisplayResponse>, ApiError> {
    match state.update_display(&patch) {
        Ok(display) => Ok(Json(DisplayResponse {
            display,
            timestamp: Utc::now(),
        })),
        Err(e) => {
            warn!("Rejected display settings: {}", e);
            Err(reject(settings_error_status(&e), e.to_string()))
        }
    }
}

/// Handle PUT /settings/timer-input - One keystroke in a timer input field
pub async fn timer_input_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<TimerInputUpdate>,
) -> Result<Json<TimerInputResponse>, ApiError> {
    match state.set_timer_field(update.field, &update.value) {
        Ok(last_timer) => Ok(Json(TimerInputResponse {
            total_seconds: last_timer.total_seconds(),
            last_timer,
        })),
        Err(e) => {
            warn!("Rejected timer input: {}", e);
            Err(reject(settings_error_status(&e), e.to_string()))
        }
    }
}

/// Handle PUT /settings/persist - Toggle writing settings to disk
pub async fn persist_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<PersistUpdate>,
) -> Result<Json<SettingsResponse>, ApiError> {
    if let Err(e) = state.set_persist(update.enabled) {
        error!("Failed to save settings: {}", e);
        state.add_error(format!("Config save failed: {}", e));
        return Err(reject(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
    }

    let (settings, persist) = state.get_settings();
    Ok(Json(SettingsResponse { persist, settings }))
}

/// Handle PUT /overlay/visible
pub async fn visibility_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<VisibilityUpdate>,
) -> StatusCode {
    state.set_overlay_visible(update.visible);
    StatusCode::ACCEPTED
}

/// Handle POST /overlay/pointer - Drag or resize input on the overlay
pub async fn pointer_handler(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerEvent>,
) -> StatusCode {
    state.pointer(event);
    StatusCode::ACCEPTED
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
