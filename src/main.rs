//! Shutdown Timer - A countdown that shuts the computer down
//!
//! This is the main entry point for the shutdown-timer application.

use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use shutdown_timer::{
    api::create_router,
    config::Config,
    overlay::{HeadlessOverlay, OverlayController},
    services::{check_shutdown_available, DryRunShutdown, HostShutdown, ShutdownCoordinator, ShutdownPrimitive},
    settings::ConfigStore,
    state::AppState,
    tasks::{countdown_task, overlay_task},
    timer::SystemClock,
    utils::close_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("shutdown_timer={},tower_http=info", config.log_level()))
        .init();

    info!("Starting shutdown-timer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, config_file={}, persist={}, warning={}s, grace={}s",
        config.host,
        config.port,
        config.config_file.display(),
        config.persist,
        config.warning_seconds,
        config.grace_seconds
    );

    // Settings: persisted keys merged over the defaults
    let mut store = ConfigStore::new(config.config_file.clone(), config.persist);
    let settings = store.load();

    let primitive: Arc<dyn ShutdownPrimitive> = if config.dry_run {
        warn!("Dry run enabled, the system will not be shut down");
        Arc::new(DryRunShutdown)
    } else {
        // A missing command is reported when the countdown completes
        if let Err(e) = check_shutdown_available().await {
            warn!("{}", e);
        }
        Arc::new(HostShutdown)
    };

    // Create application state
    let (state, display_rx) = AppState::new(
        config.port,
        config.host.clone(),
        store,
        Arc::new(SystemClock),
        config.warning_seconds,
    );
    let state = Arc::new(state);

    // The overlay task owns the overlay for the lifetime of the process
    let controller = OverlayController::new(HeadlessOverlay::new(), settings.display, !config.hide_overlay);
    tokio::spawn(overlay_task(Arc::clone(&state), controller, display_rx));

    // Start the countdown background task
    let coordinator = Arc::new(ShutdownCoordinator::new(primitive, config.grace()));
    tokio::spawn(countdown_task(Arc::clone(&state), coordinator));

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr).await?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /timer/start        - Start the countdown");
    info!("  POST /timer/pause        - Pause the countdown");
    info!("  POST /timer/resume       - Resume the countdown");
    info!("  POST /timer/cancel       - Cancel the countdown");
    info!("  POST /warning/cancel     - Cancel the pending shutdown");
    info!("  GET  /status             - Timer, overlay and session status");
    info!("  GET  /settings           - Current settings");
    info!("  PUT  /settings/display   - Update overlay appearance");
    info!("  PUT  /settings/timer-input - Type into a timer field");
    info!("  PUT  /settings/persist   - Toggle saving settings to disk");
    info!("  PUT  /overlay/visible    - Show or hide the overlay");
    info!("  POST /overlay/pointer    - Drag or resize the overlay");
    info!("  GET  /health             - Health check");

    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        _ = close_signal() => {
            info!("Close signal received");
        }
    }

    // Never leave a countdown running past exit
    state.close();

    info!("Shutdown timer closed");
    Ok(())
}
