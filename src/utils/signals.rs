//! Signal handling for application close

use tracing::{info, warn};

/// Wait until the user closes the application (SIGTERM, SIGINT)
#[cfg(unix)]
pub async fn close_signal() {
    use futures::stream::StreamExt;
    use signal_hook_tokio::Signals;

    let mut signals = match Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ]) {
        Ok(signals) => signals,
        Err(e) => {
            warn!("Failed to register close signal handler: {}, falling back to ctrl-c", e);
            ctrl_c().await;
            return;
        }
    };

    if let Some(signal) = signals.next().await {
        info!("Received signal {}, closing application", signal);
    }
}

/// Wait until the user closes the application (Ctrl-C)
#[cfg(not(unix))]
pub async fn close_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl-c, closing application"),
        Err(e) => warn!("Failed to wait for ctrl-c: {}", e),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_sigterm_resolves_close_signal() {
        let waiter = tokio::spawn(close_signal());
        // First poll registers the handler
        tokio::task::yield_now().await;
        tokio::time::sleep(Duration::from_millis(20)).await;

        signal_hook::low_level::raise(signal_hook::consts::SIGTERM).unwrap();

        tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("close signal not observed")
            .unwrap();
    }
}
