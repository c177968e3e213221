//! User-visible session status

use serde::{Deserialize, Serialize};

/// Status line and accumulated errors shown to the user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    /// Latest status message
    pub status_message: String,
    /// Errors for client visibility
    pub errors: Vec<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            status_message: "Ready to start timer".to_string(),
            errors: Vec::new(),
        }
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }

    pub fn add_error(&mut self, error: String) {
        self.errors.push(error);
    }

    /// Clear errors mentioning a specific component
    pub fn clear_errors_for(&mut self, component: &str) {
        let initial_count = self.errors.len();
        self.errors
            .retain(|error| !error.to_lowercase().contains(&component.to_lowercase()));

        if self.errors.len() != initial_count {
            tracing::info!(
                "Cleared {} errors for component: {}",
                initial_count - self.errors.len(),
                component
            );
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}
