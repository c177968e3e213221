//! Messages passed between the control surface, tick loop and overlay

use crate::{
    overlay::{GeometryEdit, PointerEvent},
    settings::DisplaySettings,
};

/// Timer transitions announced to the tick loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerControl {
    Started,
    Paused,
    Resumed,
    Canceled,
}

/// Posts to the interactive context that owns the overlay
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayEvent {
    /// New remaining time
    Tick(f64),
    /// Warning threshold reached; carries the threshold in seconds
    Warning(f64),
    /// Countdown reached zero
    Completed,
    /// Countdown ended early; show the idle text and drop any notice
    Reset,
    DismissWarning,
    /// Fresh settings, and which geometry keys the edit set
    SettingsChanged {
        settings: DisplaySettings,
        edit: GeometryEdit,
    },
    SetVisible(bool),
    Pointer(PointerEvent),
}
