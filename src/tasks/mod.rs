//! Background tasks module
//!
//! The countdown tick loop and the overlay owner run alongside the HTTP server.

pub mod countdown;
pub mod overlay_sync;

// Re-export main functions
pub use countdown::countdown_task;
pub use overlay_sync::overlay_task;
