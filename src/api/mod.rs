//! HTTP API module
//!
//! This module contains all HTTP endpoint handlers and response structures.
//! It is the dispatch surface a presentation layer drives the timer through.

pub mod handlers;
pub mod responses;

use std::sync::Arc;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;
use handlers::*;

/// Create the HTTP router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/timer/start", post(start_handler))
        .route("/timer/pause", post(pause_handler))
        .route("/timer/resume", post(resume_handler))
        .route("/timer/cancel", post(cancel_handler))
        .route("/warning/cancel", post(warning_cancel_handler))
        .route("/settings", get(settings_handler))
        .route("/settings/display", put(display_handler))
        .route("/settings/timer-input", put(timer_input_handler))
        .route("/settings/persist", put(persist_handler))
        .route("/overlay/visible", put(visibility_handler))
        .route("/overlay/pointer", post(pointer_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        settings::{ConfigStore, LastTimerInput, TimerField},
        state::{DisplayEvent, TimerStatus},
        timer::ManualClock,
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    fn test_state() -> (Arc<AppState>, mpsc::UnboundedReceiver<DisplayEvent>) {
        let store = ConfigStore::new("unused.json", false);
        let (state, display_rx) =
            AppState::new(0, "127.0.0.1".to_string(), store, Arc::new(ManualClock::new()), 10.0);
        (Arc::new(state), display_rx)
    }

    async fn call(
        state: &Arc<AppState>,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = create_router(Arc::clone(state)).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _rx) = test_state();
        let (status, body) = call(&state, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_start_pause_resume_cancel() {
        let (state, _rx) = test_state();

        let input = json!({ "days": 0, "hours": 0, "minutes": 1, "seconds": 30 });
        let (status, body) = call(&state, Method::POST, "/timer/start", Some(input)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Timer started for 1:30");
        assert_eq!(body["timer"]["status"], "running");

        let (status, _) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = call(&state, Method::POST, "/timer/pause", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["status"], "paused");

        let (status, _) = call(&state, Method::POST, "/timer/pause", None).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = call(&state, Method::POST, "/timer/resume", None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = call(&state, Method::POST, "/timer/cancel", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["status"], "canceled");
        assert_eq!(state.get_timer_state().status, TimerStatus::Canceled);
    }

    #[tokio::test]
    async fn test_start_without_duration_is_bad_request() {
        let (state, _rx) = test_state();
        let (status, body) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_start_rejects_unparsable_duration() {
        let (state, _rx) = test_state();
        state.set_timer_field(TimerField::Hours, "2").unwrap();

        let negative = json!({ "days": 0, "hours": 0, "minutes": -5, "seconds": 0 });
        let (status, body) = call(&state, Method::POST, "/timer/start", Some(negative)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], "error");

        let wrong_type = json!({ "minutes": "five" });
        let (status, _) = call(&state, Method::POST, "/timer/start", Some(wrong_type)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let request = Request::builder()
            .method(Method::POST)
            .uri("/timer/start")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{\"minutes\": 5"))
            .unwrap();
        let response = create_router(Arc::clone(&state)).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Nothing started and the stored input is untouched
        assert_eq!(state.get_timer_state().status, TimerStatus::Idle);
        assert_eq!(state.get_settings().0.last_timer, LastTimerInput::new(0, 2, 0, 0));
    }

    #[tokio::test]
    async fn test_start_with_partial_body_fills_missing_fields() {
        let (state, _rx) = test_state();
        state.set_timer_field(TimerField::Hours, "2").unwrap();

        let (status, body) =
            call(&state, Method::POST, "/timer/start", Some(json!({ "minutes": 5 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["total_seconds"], 300.0);
        assert_eq!(state.get_settings().0.last_timer, LastTimerInput::new(0, 0, 5, 0));
    }

    #[tokio::test]
    async fn test_start_uses_typed_input() {
        let (state, _rx) = test_state();
        let field = json!({ "field": "minutes", "value": "75" });
        let (status, body) = call(&state, Method::PUT, "/settings/timer-input", Some(field)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["last_timer"]["minutes"], 59);
        assert_eq!(body["total_seconds"], 3540);

        let bad = json!({ "field": "seconds", "value": "4x" });
        let (status, _) = call(&state, Method::PUT, "/settings/timer-input", Some(bad)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = call(&state, Method::POST, "/timer/start", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["timer"]["total_seconds"], 3540.0);
    }

    #[tokio::test]
    async fn test_display_update_validates_colors() {
        let (state, mut rx) = test_state();

        let patch = json!({ "text_color": "#00FF00", "opacity": 3.0 });
        let (status, body) = call(&state, Method::PUT, "/settings/display", Some(patch)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["display"]["text_color"], "#00FF00");
        assert_eq!(body["display"]["opacity"], 1.0);
        assert!(matches!(rx.try_recv(), Ok(DisplayEvent::SettingsChanged { .. })));

        let patch = json!({ "bg_color": "blue" });
        let (status, _) = call(&state, Method::PUT, "/settings/display", Some(patch)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = call(&state, Method::GET, "/settings", None).await;
        assert_eq!(body["settings"]["bg_color"], "#000000");
        assert_eq!(body["persist"], false);
    }

    #[tokio::test]
    async fn test_overlay_endpoints_post_events() {
        let (state, mut rx) = test_state();

        let (status, _) =
            call(&state, Method::PUT, "/overlay/visible", Some(json!({ "visible": false }))).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(rx.try_recv().unwrap(), DisplayEvent::SetVisible(false));

        let press = json!({ "kind": "press", "button": "primary", "x": 4, "y": 8 });
        let (status, _) = call(&state, Method::POST, "/overlay/pointer", Some(press)).await;
        assert_eq!(status, StatusCode::ACCEPTED);
        assert!(matches!(rx.try_recv(), Ok(DisplayEvent::Pointer(_))));
    }

    #[tokio::test]
    async fn test_status_reports_session() {
        let (state, _rx) = test_state();
        let (status, body) = call(&state, Method::GET, "/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_message"], "Ready to start timer");
        assert_eq!(body["remaining_display"], "0 sec");
        assert_eq!(body["timer"]["status"], "idle");

        call(&state, Method::POST, "/warning/cancel", None).await;
        let (_, body) = call(&state, Method::GET, "/status", None).await;
        assert_eq!(body["last_action"], Value::Null);
    }
}
