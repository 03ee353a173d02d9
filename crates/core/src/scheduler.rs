// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One-shot timers keyed by id
//!
//! Setting a timer under an id that is already armed replaces it. Cancelled
//! and replaced entries stay in the heap and are dropped lazily when polled.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Timer {
    fire_at: Instant,
    id: String,
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Min-heap: earliest first, ties broken by id
        Reverse((self.fire_at, &self.id)).cmp(&Reverse((other.fire_at, &other.id)))
    }
}

/// Pending timers for one owner
#[derive(Debug, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Timer>,
    armed: HashMap<String, Instant>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `id` to fire `duration` after `now`
    ///
    /// Durations past the end of the clock are clamped to the farthest
    /// deadline `Instant` can represent.
    pub fn set_timer(&mut self, id: impl Into<String>, duration: Duration, now: Instant) {
        let id = id.into();
        let fire_at = now.checked_add(duration).unwrap_or_else(|| far_future(now));
        self.armed.insert(id.clone(), fire_at);
        self.heap.push(Timer { fire_at, id });
    }

    /// Disarm `id`; unknown ids are ignored
    pub fn cancel_timer(&mut self, id: &str) {
        self.armed.remove(id);
    }

    /// Remove and return the ids of every timer due at or before `now`
    pub fn fired_timers(&mut self, now: Instant) -> Vec<String> {
        let mut fired = Vec::new();
        while let Some(timer) = self.heap.peek() {
            if timer.fire_at > now {
                break;
            }
            let Some(timer) = self.heap.pop() else {
                break;
            };
            if self.armed.get(&timer.id) == Some(&timer.fire_at) {
                self.armed.remove(&timer.id);
                fired.push(timer.id);
            }
        }
        fired
    }

    /// Earliest deadline among armed timers
    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.values().min().copied()
    }

    pub fn has_timers(&self) -> bool {
        !self.armed.is_empty()
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.armed.contains_key(id)
    }
}

/// Latest instant reachable from `now` without overflowing
fn far_future(now: Instant) -> Instant {
    let mut deadline = now;
    let mut span = Duration::MAX;
    while !span.is_zero() {
        match deadline.checked_add(span) {
            Some(later) => deadline = later,
            None => span /= 2,
        }
    }
    deadline
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
