//! Overlay owner task
//!
//! The controller lives on this task alone. Everything else reaches it
//! through fire-and-forget display events and reads it back through the
//! published snapshot.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::{
    overlay::{OverlayController, OverlayWindow},
    state::{AppState, DisplayEvent},
};

/// Apply display events to the overlay until every sender is gone
pub async fn overlay_task<W: OverlayWindow>(
    state: Arc<AppState>,
    mut controller: OverlayController<W>,
    mut display_rx: mpsc::UnboundedReceiver<DisplayEvent>,
) {
    info!("Starting overlay task");
    state.publish_overlay(controller.snapshot());

    while let Some(event) = display_rx.recv().await {
        apply_event(&state, &mut controller, event);
        state.publish_overlay(controller.snapshot());
    }

    info!("Display channel closed, stopping overlay task");
}

fn apply_event<W: OverlayWindow>(
    state: &AppState,
    controller: &mut OverlayController<W>,
    event: DisplayEvent,
) {
    match event {
        DisplayEvent::Tick(remaining) => controller.on_tick(remaining),
        DisplayEvent::Warning(threshold) => controller.present_warning(threshold),
        DisplayEvent::Completed => {
            controller.dismiss_warning();
        }
        DisplayEvent::Reset => {
            controller.dismiss_warning();
            controller.reset();
        }
        DisplayEvent::DismissWarning => {
            if controller.dismiss_warning() {
                debug!("Warning notice dismissed");
            }
        }
        DisplayEvent::SettingsChanged { settings, edit } => {
            controller.on_settings_changed(settings, edit);
        }
        DisplayEvent::SetVisible(visible) => controller.set_visible(visible),
        DisplayEvent::Pointer(pointer) => {
            let outcome = controller.handle_pointer(pointer);
            if let Some(size) = outcome.font_size {
                state.record_font_size(size);
            }
            if let Some(geometry) = outcome.released {
                state.record_overlay_geometry(geometry);
            }
        }
    }
}
