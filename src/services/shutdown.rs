//! Final step of a completed countdown

use std::{sync::Arc, time::Duration};
use tracing::{error, info};

use super::system::ShutdownPrimitive;
use crate::{error::ShutdownError, state::AppState};

/// Flushes settings and asks the host to shut down.
///
/// A failed shutdown is reported to the user; the application keeps running.
pub struct ShutdownCoordinator {
    primitive: Arc<dyn ShutdownPrimitive>,
    grace: Duration,
}

impl ShutdownCoordinator {
    pub fn new(primitive: Arc<dyn ShutdownPrimitive>, grace: Duration) -> Self {
        Self { primitive, grace }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Run once per completed countdown
    pub async fn execute(&self, state: &AppState) -> Result<(), ShutdownError> {
        state.set_status("Performing shutdown...");

        // Best effort, failures are only logged
        state.flush_settings();

        match self.primitive.schedule(self.grace).await {
            Ok(()) => {
                info!("Shutdown requested with {}s grace", self.grace.as_secs());
                Ok(())
            }
            Err(e) => {
                error!("Failed to shut down system: {}", e);
                state.set_status(format!("Shutdown error: {}", e));
                state.add_error(format!("System shutdown failed: {}", e));
                Err(e)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{settings::ConfigStore, timer::ManualClock};
    use futures::future::BoxFuture;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts requests and answers with a fixed result
    #[derive(Debug, Default)]
    pub(crate) struct RecordingShutdown {
        pub calls: AtomicUsize,
        pub fail_with: Option<ShutdownError>,
    }

    impl ShutdownPrimitive for RecordingShutdown {
        fn schedule(&self, _grace: Duration) -> BoxFuture<'_, Result<(), ShutdownError>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let result = match &self.fail_with {
                Some(e) => Err(e.clone()),
                None => Ok(()),
            };
            Box::pin(async move { result })
        }
    }

    fn state() -> AppState {
        let store = ConfigStore::new("unused.json", false);
        AppState::new(0, "127.0.0.1".to_string(), store, Arc::new(ManualClock::new()), 10.0).0
    }

    #[tokio::test]
    async fn test_successful_shutdown_sets_status() {
        let primitive = Arc::new(RecordingShutdown::default());
        let coordinator = ShutdownCoordinator::new(primitive.clone(), Duration::from_secs(5));
        let state = state();

        assert_eq!(coordinator.execute(&state).await, Ok(()));
        assert_eq!(primitive.calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.get_session_state().status_message, "Performing shutdown...");
    }

    #[tokio::test]
    async fn test_failed_shutdown_is_reported_not_fatal() {
        let primitive = Arc::new(RecordingShutdown {
            fail_with: Some(ShutdownError::Failed("access denied".to_string())),
            ..Default::default()
        });
        let coordinator = ShutdownCoordinator::new(primitive, Duration::from_secs(5));
        let state = state();

        assert!(coordinator.execute(&state).await.is_err());
        let session = state.get_session_state();
        assert_eq!(
            session.status_message,
            "Shutdown error: shutdown command failed: access denied"
        );
        assert_eq!(session.errors.len(), 1);
    }
}
