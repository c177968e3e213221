//! Tunable constants for the countdown and overlay

use std::time::Duration;

/// Default settings file, relative to the working directory
pub const CONFIG_FILE: &str = "config_for_shutdown_timer.json";

/// Remaining seconds at which the pre-shutdown warning is raised
pub const WARNING_THRESHOLD_SECS: f64 = 10.0;

/// Tick cadence while the countdown is running
pub const RUNNING_TICK: Duration = Duration::from_secs(1);

/// Tick cadence while paused, so a resume is picked up quickly
pub const PAUSED_TICK: Duration = Duration::from_millis(100);

/// Delay between the shutdown request and the actual host shutdown
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Padding added around the measured text in auto-size mode
pub const AUTO_SIZE_PADDING: u32 = 5;

/// Smallest overlay a manual resize may produce
pub const MIN_OVERLAY_WIDTH: u32 = 200;
pub const MIN_OVERLAY_HEIGHT: u32 = 100;

/// Font size heuristic for resized boxes: min(width / 5, height / 3)
pub const FONT_WIDTH_DIVISOR: u32 = 5;
pub const FONT_HEIGHT_DIVISOR: u32 = 3;

pub const MIN_FONT_SIZE: u32 = 10;
pub const MAX_FONT_SIZE: u32 = 200;

pub const MIN_OPACITY: f64 = 0.1;
pub const MAX_OPACITY: f64 = 1.0;

/// Widest string the overlay is expected to show, used for the initial size
pub const WIDEST_DISPLAY_TEXT: &str = "99:99:99:99";

/// Text shown while no countdown is active
pub const IDLE_DISPLAY_TEXT: &str = "00:00:00";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cadences_are_ordered() {
        assert!(PAUSED_TICK < RUNNING_TICK);
        assert!(RUNNING_TICK <= Duration::from_secs(1));
    }

    #[test]
    fn test_font_bounds_are_valid() {
        assert!(MIN_FONT_SIZE < MAX_FONT_SIZE);
        assert!(MIN_OPACITY > 0.0 && MIN_OPACITY < MAX_OPACITY);
    }
}
