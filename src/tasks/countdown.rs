//! Countdown tick loop background task

use std::sync::Arc;
use tokio::{
    sync::broadcast::{self, error::RecvError},
    time::sleep,
};
use tracing::{debug, error, info, warn};

use crate::{
    constants::{PAUSED_TICK, RUNNING_TICK},
    services::ShutdownCoordinator,
    state::{AppState, DisplayEvent, TimerControl},
    timer::TickOutcome,
};

/// Background task that drives the timer engine whenever a countdown starts
pub async fn countdown_task(state: Arc<AppState>, coordinator: Arc<ShutdownCoordinator>) {
    info!("Starting countdown task");

    let mut control_rx = state.control_tx.subscribe();

    loop {
        // Wait for a countdown to start
        match control_rx.recv().await {
            Ok(TimerControl::Started) => {
                run_countdown(&state, &coordinator, &mut control_rx).await;
            }
            Ok(control) => {
                debug!("Ignoring {:?}, no countdown is being driven", control);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!("Countdown task missed {} control messages", skipped);
                if state.get_timer_state().is_active() {
                    run_countdown(&state, &coordinator, &mut control_rx).await;
                }
            }
            Err(RecvError::Closed) => {
                info!("Control channel closed, stopping countdown task");
                break;
            }
        }
    }
}

/// Tick until the countdown completes, is canceled or faults
async fn run_countdown(
    state: &AppState,
    coordinator: &ShutdownCoordinator,
    control_rx: &mut broadcast::Receiver<TimerControl>,
) {
    state.attach_loop();
    debug!("Tick loop attached");

    loop {
        let outcome = state.tick_timer();

        match &outcome {
            TickOutcome::Continue(remaining) => {
                state.post_display(DisplayEvent::Tick(*remaining));
            }
            TickOutcome::WarnThreshold(remaining) => {
                state.post_display(DisplayEvent::Tick(*remaining));
                state.post_display(DisplayEvent::Warning(state.warning_threshold()));
            }
            TickOutcome::Paused(_) => {}
            TickOutcome::Completed => {
                info!("Countdown finished, starting shutdown");
                state.post_display(DisplayEvent::Tick(0.0));
                state.post_display(DisplayEvent::Completed);
                if let Err(e) = coordinator.execute(state).await {
                    warn!("Shutdown did not go through, application stays up: {}", e);
                }
            }
            TickOutcome::Inactive(status) => {
                debug!("Countdown is {}, tick loop stopping", status);
            }
            TickOutcome::Aborted(e) => {
                error!("Countdown aborted: {}", e);
                state.set_status(format!("Error: {}", e));
                state.add_error(e.to_string());
                state.post_display(DisplayEvent::Reset);
            }
        }

        if outcome.is_terminal() {
            break;
        }

        let cadence = if matches!(outcome, TickOutcome::Paused(_)) {
            PAUSED_TICK
        } else {
            RUNNING_TICK
        };

        // A control message cuts the wait short so pause, resume and cancel
        // are observed right away
        tokio::select! {
            _ = sleep(cadence) => {}
            message = control_rx.recv() => match message {
                Ok(control) => debug!("Tick loop woken by {:?}", control),
                Err(RecvError::Lagged(skipped)) => debug!("Tick loop skipped {} control messages", skipped),
                Err(RecvError::Closed) => sleep(cadence).await,
            }
        }
    }

    state.detach_loop();
    debug!("Tick loop detached");
}
