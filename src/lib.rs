//! Shutdown Timer - A countdown that shuts the computer down
//!
//! This library provides the countdown state machine, the always-on-top
//! overlay synchronization, user settings persistence and the local HTTP
//! control surface that drives them.

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod overlay;
pub mod services;
pub mod settings;
pub mod state;
pub mod tasks;
pub mod timer;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use error::{PersistenceError, SettingsError, ShutdownError, TimerError};
pub use state::AppState;
pub use timer::{TickOutcome, TimerEngine};
pub use utils::{close_signal, format_time};
