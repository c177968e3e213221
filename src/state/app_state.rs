//! Main application state management

use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::sync::{broadcast, mpsc, watch};
use tracing::{debug, info, warn};

use super::{DisplayEvent, SessionState, TimerControl, TimerState};
use crate::{
    error::{PersistenceError, SettingsError, TimerError},
    overlay::{Geometry, GeometryEdit, OverlaySnapshot, PointerEvent},
    settings::{ConfigStore, DisplayPatch, DisplaySettings, LastTimerInput, Settings, TimerField},
    timer::{Clock, TickOutcome, TimerEngine},
    utils::format_time,
};

/// Shared state behind the control surface, the tick loop and the overlay task.
///
/// The timer engine is the only writer of countdown state; display settings
/// are written from the control surface and the overlay task only.
#[derive(Debug)]
pub struct AppState {
    /// Countdown state machine
    pub engine: Arc<Mutex<TimerEngine>>,
    /// User settings and their persistence
    pub config_store: Arc<Mutex<ConfigStore>>,
    /// Status line and errors
    pub session: Arc<Mutex<SessionState>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
    /// Timer transitions for the tick loop
    pub control_tx: broadcast::Sender<TimerControl>,
    /// Channel for timer updates
    pub timer_update_tx: watch::Sender<TimerState>,
    /// Keep the receiver alive to prevent channel closure
    pub _timer_update_rx: watch::Receiver<TimerState>,
    /// Fire-and-forget posts to the overlay task
    pub display_tx: mpsc::UnboundedSender<DisplayEvent>,
    /// Latest overlay state published by the overlay task
    pub overlay_tx: watch::Sender<Option<OverlaySnapshot>>,
}

impl AppState {
    /// Create the state and the receiving end of the display channel
    pub fn new(
        port: u16,
        host: String,
        config_store: ConfigStore,
        clock: Arc<dyn Clock>,
        warning_threshold: f64,
    ) -> (Self, mpsc::UnboundedReceiver<DisplayEvent>) {
        let (control_tx, _) = broadcast::channel(16);
        let (timer_update_tx, timer_update_rx) = watch::channel(TimerState::new());
        let (display_tx, display_rx) = mpsc::unbounded_channel();
        let (overlay_tx, _) = watch::channel(None);

        let state = Self {
            engine: Arc::new(Mutex::new(TimerEngine::with_warning_threshold(clock, warning_threshold))),
            config_store: Arc::new(Mutex::new(config_store)),
            session: Arc::new(Mutex::new(SessionState::new())),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
            control_tx,
            timer_update_tx,
            _timer_update_rx: timer_update_rx,
            display_tx,
            overlay_tx,
        };
        (state, display_rx)
    }

    // ── Timer transitions ───────────────────────────────────────────────

    /// Start a countdown from `input`, or from the last stored input
    pub fn start_timer(&self, input: Option<LastTimerInput>) -> Result<TimerState, TimerError> {
        let input = {
            let mut store = self.store();
            if let Some(input) = input {
                store.set_last_timer(input);
                store.save_or_warn();
            }
            store.last_timer()
        };
        let total = input.total_seconds() as f64;

        let snapshot = {
            let mut engine = self.engine();
            engine.start(total)?;
            engine.snapshot()
        };

        self.session().clear_errors_for("shutdown");
        self.set_status(format!("Timer started for {}", format_time(total)));
        self.record_action("start");
        self.publish_timer(snapshot.clone());
        self.notify(TimerControl::Started);
        self.post_display(DisplayEvent::Tick(total));
        Ok(snapshot)
    }

    pub fn pause_timer(&self) -> Result<TimerState, TimerError> {
        let snapshot = {
            let mut engine = self.engine();
            engine.pause()?;
            engine.snapshot()
        };

        self.set_status("Timer paused");
        self.record_action("pause");
        self.publish_timer(snapshot.clone());
        self.notify(TimerControl::Paused);
        Ok(snapshot)
    }

    pub fn resume_timer(&self) -> Result<TimerState, TimerError> {
        let snapshot = {
            let mut engine = self.engine();
            engine.resume()?;
            engine.snapshot()
        };

        self.set_status("Timer resumed");
        self.record_action("resume");
        self.publish_timer(snapshot.clone());
        self.notify(TimerControl::Resumed);
        Ok(snapshot)
    }

    /// Cancel any active countdown. Always succeeds.
    pub fn cancel_timer(&self) -> TimerState {
        self.cancel_with_action("cancel")
    }

    /// The warning notice's "cancel shutdown" action
    pub fn cancel_from_warning(&self) -> TimerState {
        self.cancel_with_action("cancel-shutdown")
    }

    fn cancel_with_action(&self, action: &str) -> TimerState {
        let (canceled, snapshot) = {
            let mut engine = self.engine();
            let canceled = engine.cancel();
            (canceled, engine.snapshot())
        };

        self.post_display(DisplayEvent::DismissWarning);
        if canceled {
            self.set_status("Timer canceled");
            self.record_action(action);
            self.publish_timer(snapshot.clone());
            self.notify(TimerControl::Canceled);
            self.post_display(DisplayEvent::Reset);
        } else {
            debug!("No active countdown to cancel");
        }
        snapshot
    }

    /// Advance the countdown one step (tick loop only)
    pub fn tick_timer(&self) -> TickOutcome {
        let (outcome, snapshot) = {
            let mut engine = self.engine();
            let outcome = engine.tick();
            (outcome, engine.snapshot())
        };
        self.publish_timer(snapshot);
        outcome
    }

    pub fn attach_loop(&self) {
        self.engine().attach_loop();
    }

    pub fn detach_loop(&self) {
        self.engine().detach_loop();
    }

    pub fn warning_threshold(&self) -> f64 {
        self.engine().warning_threshold()
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> TimerState {
        self.engine().snapshot()
    }

    pub fn subscribe_timer(&self) -> watch::Receiver<TimerState> {
        self.timer_update_tx.subscribe()
    }

    // ── Settings ────────────────────────────────────────────────────────

    pub fn get_settings(&self) -> (Settings, bool) {
        let store = self.store();
        (store.settings().clone(), store.persist_enabled())
    }

    /// Apply a display edit and forward the result to the overlay
    pub fn update_display(&self, patch: &DisplayPatch) -> Result<DisplaySettings, SettingsError> {
        let display = self.store().update_display(patch)?;
        info!("Display settings updated");
        self.post_display(DisplayEvent::SettingsChanged {
            settings: display.clone(),
            edit: GeometryEdit::of(patch),
        });
        Ok(display)
    }

    /// Validate one keystroke in a timer input field
    pub fn set_timer_field(&self, field: TimerField, raw: &str) -> Result<LastTimerInput, SettingsError> {
        self.store().set_timer_field(field, raw)
    }

    pub fn set_persist(&self, persist: bool) -> Result<(), PersistenceError> {
        self.store().set_persist(persist)
    }

    /// Font size picked by a resize with auto-size on (overlay task only)
    pub fn record_font_size(&self, size: u32) {
        let mut store = self.store();
        store.set_font_size(size);
        store.save_or_warn();
    }

    /// Geometry left by a drag or resize (overlay task only)
    pub fn record_overlay_geometry(&self, geometry: Geometry) {
        self.store()
            .set_overlay_geometry(geometry.position(), geometry.size());
    }

    /// Best-effort write of the current settings
    pub fn flush_settings(&self) {
        self.store().save_or_warn();
    }

    // ── Overlay ─────────────────────────────────────────────────────────

    pub fn set_overlay_visible(&self, visible: bool) {
        self.post_display(DisplayEvent::SetVisible(visible));
    }

    pub fn pointer(&self, event: PointerEvent) {
        self.post_display(DisplayEvent::Pointer(event));
    }

    pub fn publish_overlay(&self, snapshot: OverlaySnapshot) {
        self.overlay_tx.send_replace(Some(snapshot));
    }

    pub fn overlay_snapshot(&self) -> Option<OverlaySnapshot> {
        self.overlay_tx.borrow().clone()
    }

    pub fn subscribe_overlay(&self) -> watch::Receiver<Option<OverlaySnapshot>> {
        self.overlay_tx.subscribe()
    }

    /// Post to the overlay task without waiting
    pub fn post_display(&self, event: DisplayEvent) {
        if let Err(e) = self.display_tx.send(event) {
            warn!("Failed to post display event: {}", e);
        }
    }

    // ── Session ─────────────────────────────────────────────────────────

    pub fn set_status(&self, message: impl Into<String>) {
        let message = message.into();
        info!("Status: {}", message);
        self.session().set_status(message);
    }

    /// Add an error to the session
    pub fn add_error(&self, error: String) {
        warn!("Adding error to session: {}", error);
        self.session().add_error(error);
    }

    pub fn get_session_state(&self) -> SessionState {
        self.session().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    /// Application is closing: stop any countdown and store the overlay
    /// geometry and timer input
    pub fn close(&self) {
        if self.get_timer_state().is_active() {
            info!("Closing with an active timer, canceling it");
        }
        self.cancel_with_action("close");

        let mut store = self.store();
        if let Some(overlay) = self.overlay_snapshot() {
            store.set_overlay_geometry(overlay.geometry.position(), overlay.geometry.size());
        }
        store.save_or_warn();
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }

    fn publish_timer(&self, snapshot: TimerState) {
        if let Err(e) = self.timer_update_tx.send(snapshot) {
            warn!("Failed to send timer update: {}", e);
        }
    }

    fn notify(&self, control: TimerControl) {
        // No receivers just means the tick loop is not running yet
        if self.control_tx.send(control).is_err() {
            debug!("No tick loop listening for {:?}", control);
        }
    }

    // A panic while holding one of these locks must not take the timer down
    // with it, so poisoned guards are recovered.

    fn engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn store(&self) -> MutexGuard<'_, ConfigStore> {
        self.config_store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn session(&self) -> MutexGuard<'_, SessionState> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
