//! Host shutdown primitive

use futures::future::BoxFuture;
use std::time::Duration;
use tokio::{process::Command, time::sleep};
use tracing::{debug, info, warn};

use crate::error::ShutdownError;

/// Schedules an operating-system shutdown after a grace period
pub trait ShutdownPrimitive: Send + Sync {
    fn schedule(&self, grace: Duration) -> BoxFuture<'_, Result<(), ShutdownError>>;
}

/// Shuts the host down with its native command
#[derive(Debug, Default, Clone, Copy)]
pub struct HostShutdown;

impl ShutdownPrimitive for HostShutdown {
    fn schedule(&self, grace: Duration) -> BoxFuture<'_, Result<(), ShutdownError>> {
        Box::pin(execute_system_shutdown(grace))
    }
}

/// Logs the request instead of shutting down
#[derive(Debug, Default, Clone, Copy)]
pub struct DryRunShutdown;

impl ShutdownPrimitive for DryRunShutdown {
    fn schedule(&self, grace: Duration) -> BoxFuture<'_, Result<(), ShutdownError>> {
        Box::pin(async move {
            warn!("Dry run: system would shut down in {} seconds", grace.as_secs());
            Ok(())
        })
    }
}

/// Execute system shutdown after `grace`
pub async fn execute_system_shutdown(grace: Duration) -> Result<(), ShutdownError> {
    info!("Executing system shutdown in {} seconds", grace.as_secs());

    let mut command = if cfg!(windows) {
        let mut command = Command::new("shutdown");
        command.args(["/s", "/t", &grace.as_secs().to_string()]);
        command
    } else {
        // systemctl has no sub-minute delay, so wait out the grace period here
        sleep(grace).await;
        let mut command = Command::new("systemctl");
        command.arg("poweroff");
        command
    };

    debug!("Running {:?}", command);
    let output = command
        .output()
        .await
        .map_err(|e| ShutdownError::Spawn(e.to_string()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ShutdownError::Failed(stderr.trim().to_string()));
    }

    info!("System shutdown command executed");
    Ok(())
}

/// Check if the host shutdown command is available on the system
pub async fn check_shutdown_available() -> Result<(), ShutdownError> {
    let (program, arg) = if cfg!(windows) {
        ("shutdown", "/?")
    } else {
        ("systemctl", "--version")
    };

    Command::new(program)
        .arg(arg)
        .output()
        .await
        .map_err(|e| ShutdownError::Spawn(format!("{} is not available: {}", program, e)))?;

    info!("{} is available", program);
    Ok(())
}
