// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effects and events for state machine orchestration

use crate::value::Value;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Why a value is being pushed to a room's actuators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueOrigin {
    /// Resolved from the room's schedule
    Scheduled,
    /// Requested from outside, e.g. a control event
    Manual,
    /// An actuator's external change copied to its siblings
    Replicated,
}

impl fmt::Display for ValueOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ValueOrigin::Scheduled => "scheduled",
            ValueOrigin::Manual => "manual",
            ValueOrigin::Replicated => "replicated",
        };
        write!(f, "{}", s)
    }
}

/// Effects are side effects that state machines request
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Emit an event for other components to observe
    Emit(Event),
    /// Push a value to every actuator of a room
    SetValue {
        room: String,
        value: Value,
        force_resend: bool,
        origin: ValueOrigin,
    },
    /// Record the last scheduled value in the external mirror
    MirrorScheduledValue { room: String, value: Value },
    /// Set a timer
    SetTimer { id: String, duration: Duration },
    /// Cancel a timer
    CancelTimer { id: String },
}

/// Events emitted by state machines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    ValueScheduled {
        room: String,
        value: Value,
        rule: String,
    },
    ValueSet {
        room: String,
        value: Value,
        origin: ValueOrigin,
    },
    ValueRejected {
        room: String,
        reason: String,
    },
    ScheduleEmpty {
        room: String,
    },
    ScheduleAborted {
        room: String,
    },
    RescheduleArmed {
        room: String,
        delay: Duration,
    },
    RescheduleCancelled {
        room: String,
    },
}

impl Event {
    /// Get the event name for pattern matching
    /// Format: "category:subcategory:action"
    pub fn name(&self) -> &'static str {
        match self {
            Event::ValueScheduled { .. } => "room:value:scheduled",
            Event::ValueSet { .. } => "room:value:set",
            Event::ValueRejected { .. } => "room:value:rejected",
            Event::ScheduleEmpty { .. } => "room:schedule:empty",
            Event::ScheduleAborted { .. } => "room:schedule:aborted",
            Event::RescheduleArmed { .. } => "room:reschedule:armed",
            Event::RescheduleCancelled { .. } => "room:reschedule:cancelled",
        }
    }

    pub fn room(&self) -> &str {
        match self {
            Event::ValueScheduled { room, .. }
            | Event::ValueSet { room, .. }
            | Event::ValueRejected { room, .. }
            | Event::ScheduleEmpty { room }
            | Event::ScheduleAborted { room }
            | Event::RescheduleArmed { room, .. }
            | Event::RescheduleCancelled { room } => room,
        }
    }
}

#[cfg(test)]
#[path = "effect_tests.rs"]
mod tests;
