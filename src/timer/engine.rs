//! Countdown state machine

use std::{sync::Arc, time::Instant};
use tracing::{debug, info, warn};

use super::clock::Clock;
use crate::{
    constants::WARNING_THRESHOLD_SECS,
    error::TimerError,
    state::{TimerState, TimerStatus},
};

/// Result of a single tick
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// Countdown advanced, nothing else to report
    Continue(f64),
    /// Remaining time crossed the warning threshold for the first time
    WarnThreshold(f64),
    /// Remaining time reached zero
    Completed,
    /// Countdown is paused, remaining time unchanged
    Paused(f64),
    /// No countdown in progress; the tick did nothing
    Inactive(TimerStatus),
    /// Tick failed and the countdown was canceled
    Aborted(TimerError),
}

impl TickOutcome {
    /// Whether the tick loop driving this countdown should stop
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TickOutcome::Completed | TickOutcome::Inactive(_) | TickOutcome::Aborted(_)
        )
    }
}

/// Owns the countdown state and every transition on it.
///
/// Elapsed time is measured from `started_at`, which is shifted forward by
/// each paused interval on resume, so pauses never consume countdown time.
#[derive(Debug)]
pub struct TimerEngine {
    clock: Arc<dyn Clock>,
    warning_threshold: f64,
    status: TimerStatus,
    total_seconds: f64,
    remaining_seconds: f64,
    warning_fired: bool,
    started_at: Option<Instant>,
    paused_at: Option<Instant>,
    /// A tick loop is currently driving this engine
    loop_attached: bool,
}

impl TimerEngine {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_warning_threshold(clock, WARNING_THRESHOLD_SECS)
    }

    pub fn with_warning_threshold(clock: Arc<dyn Clock>, warning_threshold: f64) -> Self {
        Self {
            clock,
            warning_threshold,
            status: TimerStatus::Idle,
            total_seconds: 0.0,
            remaining_seconds: 0.0,
            warning_fired: false,
            started_at: None,
            paused_at: None,
            loop_attached: false,
        }
    }

    pub fn status(&self) -> TimerStatus {
        self.status
    }

    pub fn remaining_seconds(&self) -> f64 {
        self.remaining_seconds
    }

    pub fn warning_threshold(&self) -> f64 {
        self.warning_threshold
    }

    pub fn snapshot(&self) -> TimerState {
        TimerState {
            status: self.status,
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds,
            warning_fired: self.warning_fired,
        }
    }

    /// Begin a new countdown of `total_seconds`
    pub fn start(&mut self, total_seconds: f64) -> Result<(), TimerError> {
        if !total_seconds.is_finite() || total_seconds <= 0.0 {
            return Err(TimerError::InvalidDuration(total_seconds));
        }
        // An old loop that has not yet seen its cancellation still owns the ticks
        if self.status.is_active() || self.loop_attached {
            return Err(TimerError::InvalidTransition {
                action: "start",
                status: self.status,
            });
        }

        self.status = TimerStatus::Running;
        self.total_seconds = total_seconds;
        self.remaining_seconds = total_seconds;
        self.warning_fired = false;
        self.started_at = Some(self.clock.now());
        self.paused_at = None;

        info!("Timer started for {} seconds", total_seconds);
        Ok(())
    }

    /// Freeze the countdown
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.status != TimerStatus::Running {
            return Err(TimerError::InvalidTransition {
                action: "pause",
                status: self.status,
            });
        }

        let now = self.clock.now();
        match self.remaining_at(now) {
            Ok(remaining) => self.remaining_seconds = remaining,
            Err(e) => {
                self.abort(&e);
                return Err(e);
            }
        }

        self.status = TimerStatus::Paused;
        self.paused_at = Some(now);
        info!("Timer paused with {:.1} seconds remaining", self.remaining_seconds);
        Ok(())
    }

    /// Continue a paused countdown, excluding the paused interval
    pub fn resume(&mut self) -> Result<(), TimerError> {
        if self.status != TimerStatus::Paused {
            return Err(TimerError::InvalidTransition {
                action: "resume",
                status: self.status,
            });
        }

        let now = self.clock.now();
        if let (Some(started), Some(paused)) = (self.started_at, self.paused_at) {
            let paused_for = now.checked_duration_since(paused).unwrap_or_default();
            self.started_at = Some(started + paused_for);
            debug!("Resuming after {:?} paused", paused_for);
        }

        self.status = TimerStatus::Running;
        self.paused_at = None;
        info!("Timer resumed with {:.1} seconds remaining", self.remaining_seconds);
        Ok(())
    }

    /// Cancel a running or paused countdown. Returns whether anything changed.
    pub fn cancel(&mut self) -> bool {
        if !self.status.is_active() {
            return false;
        }

        self.status = TimerStatus::Canceled;
        self.started_at = None;
        self.paused_at = None;
        info!("Timer canceled with {:.1} seconds remaining", self.remaining_seconds);
        true
    }

    /// Advance the countdown and report what happened
    pub fn tick(&mut self) -> TickOutcome {
        match self.status {
            TimerStatus::Running => {}
            TimerStatus::Paused => return TickOutcome::Paused(self.remaining_seconds),
            other => return TickOutcome::Inactive(other),
        }

        let remaining = match self.remaining_at(self.clock.now()) {
            Ok(remaining) => remaining,
            Err(e) => {
                self.abort(&e);
                return TickOutcome::Aborted(e);
            }
        };
        self.remaining_seconds = remaining;

        if remaining <= 0.0 {
            self.status = TimerStatus::Completed;
            self.started_at = None;
            info!("Countdown completed");
            return TickOutcome::Completed;
        }

        if remaining <= self.warning_threshold && !self.warning_fired {
            self.warning_fired = true;
            info!("Countdown reached warning threshold ({:.1}s remaining)", remaining);
            return TickOutcome::WarnThreshold(remaining);
        }

        debug!("Tick: {:.1} seconds remaining", remaining);
        TickOutcome::Continue(remaining)
    }

    /// Mark that a tick loop has started driving this engine
    pub fn attach_loop(&mut self) {
        self.loop_attached = true;
    }

    /// Mark that the driving tick loop has observed the end of the countdown
    pub fn detach_loop(&mut self) {
        self.loop_attached = false;
    }

    pub fn loop_attached(&self) -> bool {
        self.loop_attached
    }

    fn remaining_at(&self, now: Instant) -> Result<f64, TimerError> {
        let started = self
            .started_at
            .ok_or_else(|| TimerError::ClockFault("running timer has no start reference".to_string()))?;
        let elapsed = now
            .checked_duration_since(started)
            .ok_or_else(|| TimerError::ClockFault("clock moved backwards".to_string()))?;

        let remaining = self.total_seconds - elapsed.as_secs_f64();
        if remaining.is_nan() {
            return Err(TimerError::ClockFault("remaining time is not a number".to_string()));
        }
        Ok(remaining.clamp(0.0, self.total_seconds))
    }

    fn abort(&mut self, error: &TimerError) {
        warn!("Timer aborted: {}", error);
        self.status = TimerStatus::Canceled;
        self.started_at = None;
        self.paused_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::clock::{ManualClock, RewindClock};

    fn engine() -> (Arc<ManualClock>, TimerEngine) {
        let clock = Arc::new(ManualClock::new());
        let engine = TimerEngine::new(clock.clone());
        (clock, engine)
    }

    #[test]
    fn test_start_rejects_invalid_durations() {
        let (_, mut engine) = engine();
        assert_eq!(engine.start(0.0), Err(TimerError::InvalidDuration(0.0)));
        assert_eq!(engine.start(-5.0), Err(TimerError::InvalidDuration(-5.0)));
        assert!(matches!(engine.start(f64::NAN), Err(TimerError::InvalidDuration(_))));
        assert_eq!(engine.status(), TimerStatus::Idle);
    }

    #[test]
    fn test_start_rejected_while_active() {
        let (_, mut engine) = engine();
        engine.start(60.0).unwrap();
        assert_eq!(
            engine.start(30.0),
            Err(TimerError::InvalidTransition { action: "start", status: TimerStatus::Running })
        );

        engine.pause().unwrap();
        assert_eq!(
            engine.start(30.0),
            Err(TimerError::InvalidTransition { action: "start", status: TimerStatus::Paused })
        );
        assert_eq!(engine.snapshot().total_seconds, 60.0);
    }

    #[test]
    fn test_start_rejected_until_loop_detaches() {
        let (_, mut engine) = engine();
        engine.start(60.0).unwrap();
        engine.attach_loop();
        engine.cancel();

        assert!(engine.start(10.0).is_err());
        engine.detach_loop();
        assert!(engine.start(10.0).is_ok());
    }

    #[test]
    fn test_tick_counts_down() {
        let (clock, mut engine) = engine();
        engine.start(100.0).unwrap();

        clock.advance_secs(1.0);
        assert_eq!(engine.tick(), TickOutcome::Continue(99.0));
        clock.advance_secs(40.5);
        assert_eq!(engine.tick(), TickOutcome::Continue(58.5));
    }

    #[test]
    fn test_pause_does_not_consume_time() {
        let (clock, mut engine) = engine();
        engine.start(100.0).unwrap();
        clock.advance_secs(10.0);
        engine.pause().unwrap();
        assert_eq!(engine.remaining_seconds(), 90.0);

        clock.advance_secs(3_600.0);
        assert_eq!(engine.tick(), TickOutcome::Paused(90.0));

        engine.resume().unwrap();
        assert_eq!(engine.tick(), TickOutcome::Continue(90.0));

        // A second pause/resume cycle accumulates correctly
        clock.advance_secs(5.0);
        engine.pause().unwrap();
        clock.advance_secs(500.0);
        engine.resume().unwrap();
        clock.advance_secs(5.0);
        assert_eq!(engine.tick(), TickOutcome::Continue(80.0));
    }

    #[test]
    fn test_pause_resume_only_from_valid_states() {
        let (_, mut engine) = engine();
        assert_eq!(
            engine.pause(),
            Err(TimerError::InvalidTransition { action: "pause", status: TimerStatus::Idle })
        );
        assert_eq!(
            engine.resume(),
            Err(TimerError::InvalidTransition { action: "resume", status: TimerStatus::Idle })
        );

        engine.start(10.0).unwrap();
        assert!(engine.resume().is_err());
        engine.pause().unwrap();
        assert!(engine.pause().is_err());
        assert_eq!(engine.status(), TimerStatus::Paused);
    }

    #[test]
    fn test_warning_fires_once() {
        let (clock, mut engine) = engine();
        engine.start(11.0).unwrap();

        let mut warnings = Vec::new();
        for _ in 0..10 {
            clock.advance_secs(1.0);
            if let TickOutcome::WarnThreshold(remaining) = engine.tick() {
                warnings.push(remaining);
            }
        }

        assert_eq!(warnings, vec![10.0]);
        assert!(engine.snapshot().warning_fired);
    }

    #[test]
    fn test_warning_fires_immediately_for_short_timers() {
        let (_, mut engine) = engine();
        engine.start(5.0).unwrap();
        assert_eq!(engine.tick(), TickOutcome::WarnThreshold(5.0));
    }

    #[test]
    fn test_completes_exactly_once() {
        let (clock, mut engine) = engine();
        engine.start(3.0).unwrap();

        let mut completions = 0;
        for _ in 0..6 {
            clock.advance_secs(1.0);
            if engine.tick() == TickOutcome::Completed {
                completions += 1;
            }
        }

        assert_eq!(completions, 1);
        assert_eq!(engine.status(), TimerStatus::Completed);
        assert_eq!(engine.remaining_seconds(), 0.0);
        assert_eq!(engine.tick(), TickOutcome::Inactive(TimerStatus::Completed));
    }

    #[test]
    fn test_overshoot_clamps_to_zero() {
        let (clock, mut engine) = engine();
        engine.start(2.0).unwrap();
        clock.advance_secs(30.0);
        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert_eq!(engine.remaining_seconds(), 0.0);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (_, mut engine) = engine();
        assert!(!engine.cancel());

        engine.start(30.0).unwrap();
        assert!(engine.cancel());
        assert!(!engine.cancel());
        assert_eq!(engine.status(), TimerStatus::Canceled);
        assert_eq!(engine.tick(), TickOutcome::Inactive(TimerStatus::Canceled));
        assert!(engine.resume().is_err());

        // Only a fresh start leaves Canceled
        engine.start(5.0).unwrap();
        assert_eq!(engine.status(), TimerStatus::Running);
        assert!(!engine.snapshot().warning_fired);
    }

    #[test]
    fn test_custom_warning_threshold() {
        let clock = Arc::new(ManualClock::new());
        let mut engine = TimerEngine::with_warning_threshold(clock.clone(), 30.0);
        engine.start(60.0).unwrap();

        clock.advance_secs(29.0);
        assert_eq!(engine.tick(), TickOutcome::Continue(31.0));
        clock.advance_secs(1.0);
        assert_eq!(engine.tick(), TickOutcome::WarnThreshold(30.0));
    }

    #[test]
    fn test_clock_going_backwards_aborts_countdown() {
        let clock = Arc::new(RewindClock::new());
        let mut engine = TimerEngine::new(clock.clone());
        engine.start(60.0).unwrap();
        clock.advance_secs(4.0);
        assert_eq!(engine.tick(), TickOutcome::Continue(56.0));

        clock.rewind_secs(10.0);
        let outcome = engine.tick();
        assert_eq!(
            outcome,
            TickOutcome::Aborted(TimerError::ClockFault("clock moved backwards".to_string()))
        );
        assert!(outcome.is_terminal());
        assert_eq!(engine.status(), TimerStatus::Canceled);
        assert_eq!(engine.tick(), TickOutcome::Inactive(TimerStatus::Canceled));

        // Remaining time stays at the last good reading and a new start works
        assert_eq!(engine.remaining_seconds(), 56.0);
        engine.start(30.0).unwrap();
        assert_eq!(engine.status(), TimerStatus::Running);
    }

    #[test]
    fn test_pause_after_clock_fault_cancels() {
        let clock = Arc::new(RewindClock::new());
        let mut engine = TimerEngine::new(clock.clone());
        engine.start(60.0).unwrap();

        clock.rewind_secs(1.0);
        assert!(matches!(engine.pause(), Err(TimerError::ClockFault(_))));
        assert_eq!(engine.status(), TimerStatus::Canceled);
    }

    #[test]
    fn test_terminal_outcomes() {
        assert!(TickOutcome::Completed.is_terminal());
        assert!(TickOutcome::Inactive(TimerStatus::Idle).is_terminal());
        assert!(!TickOutcome::Paused(3.0).is_terminal());
        assert!(!TickOutcome::WarnThreshold(3.0).is_terminal());
    }
}
