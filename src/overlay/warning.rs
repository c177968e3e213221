//! Pre-shutdown warning notice

use super::window::OverlayWindow;

/// Topmost notice raised when the countdown nears zero.
///
/// Its single action, cancel shutdown, is dispatched by the control surface;
/// the notice itself only tracks whether it is on screen.
#[derive(Debug, Default, Clone)]
pub struct WarningNotice {
    message: Option<String>,
}

impl WarningNotice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_for(threshold_secs: f64) -> String {
        format!("Shutdown in {} seconds!", threshold_secs.round() as u64)
    }

    pub fn present(&mut self, window: &mut dyn OverlayWindow, threshold_secs: f64) {
        let message = Self::message_for(threshold_secs);
        window.show_notice(&message);
        self.message = Some(message);
    }

    /// Hide the notice. Returns whether it was showing.
    pub fn dismiss(&mut self, window: &mut dyn OverlayWindow) -> bool {
        if self.message.take().is_some() {
            window.hide_notice();
            true
        } else {
            false
        }
    }

    pub fn is_visible(&self) -> bool {
        self.message.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
