//! Floating overlay module
//!
//! The presentation surface trait, the controller that keeps it in sync with
//! the countdown and settings, and the pre-shutdown warning notice.

pub mod controller;
pub mod warning;
pub mod window;

// Re-export main types
pub use controller::{
    GeometryEdit, OverlayController, OverlaySnapshot, PointerButton, PointerEvent, PointerOutcome,
};
pub use warning::WarningNotice;
pub use window::{FontSpec, Geometry, HeadlessOverlay, OverlayWindow};
