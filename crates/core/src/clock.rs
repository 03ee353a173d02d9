// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling
//!
//! Rooms need two views of time: a monotonic [`Instant`] for timer deadlines
//! and a local wall-clock [`NaiveDateTime`] for matching rules against
//! time-of-day windows. Both advance together on the fake clock.

use chrono::{Local, NaiveDateTime};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// A clock that provides the current time
pub trait Clock: Clone + Send + Sync {
    /// Monotonic time, used for timer deadlines
    fn now(&self) -> Instant;

    /// Local wall-clock time, used for rule matching
    fn local_now(&self) -> NaiveDateTime;
}

/// Real system clock
#[derive(Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn local_now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[derive(Debug)]
struct FakeTime {
    instant: Instant,
    local: NaiveDateTime,
}

/// Fake clock for testing with controllable time
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<FakeTime>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::at(NaiveDateTime::default())
    }

    /// Create a fake clock whose wall-clock time starts at `local`
    pub fn at(local: NaiveDateTime) -> Self {
        Self {
            current: Arc::new(Mutex::new(FakeTime {
                instant: Instant::now(),
                local,
            })),
        }
    }

    /// Advance the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.instant += duration;
        if let Ok(delta) = chrono::Duration::from_std(duration) {
            current.local += delta;
        }
    }

    /// Jump the wall-clock time without moving the monotonic clock
    pub fn set_local(&self, local: NaiveDateTime) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        current.local = local;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .instant
    }

    fn local_now(&self) -> NaiveDateTime {
        self.current.lock().unwrap_or_else(|e| e.into_inner()).local
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
