//! Monotonic time sources for the countdown engine

use std::{
    fmt::Debug,
    sync::Mutex,
    time::{Duration, Instant},
};

/// Source of monotonic instants
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock read through tokio, so a paused test runtime pauses it too
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        tokio::time::Instant::now().into_std()
    }
}

/// Virtual clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    origin: Instant,
    offset: Mutex<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset: Mutex::new(Duration::ZERO),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        if let Ok(mut offset) = self.offset.lock() {
            *offset += by;
        }
    }

    pub fn advance_secs(&self, secs: f64) {
        self.advance(Duration::from_secs_f64(secs));
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        let offset = self.offset.lock().map(|o| *o).unwrap_or_default();
        self.origin + offset
    }
}

/// Virtual clock that can also be wound back, for exercising tick faults
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct RewindClock {
    base: Instant,
    offset: Mutex<Duration>,
}

#[cfg(test)]
impl RewindClock {
    /// Starts an hour ahead of its base so there is room to rewind
    pub(crate) fn new() -> Self {
        Self {
            base: Instant::now(),
            offset: Mutex::new(Duration::from_secs(3_600)),
        }
    }

    pub(crate) fn advance_secs(&self, secs: f64) {
        *self.offset.lock().unwrap() += Duration::from_secs_f64(secs);
    }

    pub(crate) fn rewind_secs(&self, secs: f64) {
        let mut offset = self.offset.lock().unwrap();
        *offset = offset.saturating_sub(Duration::from_secs_f64(secs));
    }
}

#[cfg(test)]
impl Clock for RewindClock {
    fn now(&self) -> Instant {
        self.base + *self.offset.lock().unwrap()
    }
}
