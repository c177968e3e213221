//! User settings module
//!
//! The typed settings record, its partial on-disk form, and the store that
//! loads and persists it.

pub mod model;
pub mod store;

// Re-export main types
pub use model::{DisplayPatch, DisplaySettings, LastTimerInput, PartialSettings, Settings, TimerField};
pub use store::ConfigStore;
