// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Room state machine
//!
//! A room owns a schedule, the set of actuators it drives, the value last
//! resolved from the schedule and the value it last asked its actuators to
//! take. It decides when resolution runs, when a value is pushed, and when a
//! reschedule timer defers scheduling after manual intervention or drift.
//!
//! ## Reschedule timers
//!
//! At most one reschedule timer is armed per room. Each arming bumps a
//! generation that is part of the timer id, so a timer that fires after it
//! was superseded is recognised as stale and ignored.

use crate::actor_type::ValueValidator;
use crate::clock::Clock;
use crate::effect::{Effect, Event, ValueOrigin};
use crate::resolve::{resolve, Evaluator, ResolveOutcome};
use crate::result::ResultValue;
use crate::schedule::{Expression, Schedule};
use crate::value::Value;
use chrono::NaiveDateTime;
use std::sync::Arc;
use std::time::Duration;

/// Static per-room settings
#[derive(Debug, Clone, PartialEq)]
pub struct RoomConfig {
    pub id: String,
    pub friendly_name: Option<String>,
    pub actuators: Vec<String>,
    pub reschedule_delay: Duration,
    pub replicate_changes: bool,
}

impl RoomConfig {
    pub fn new(id: impl Into<String>, actuators: Vec<String>) -> Self {
        Self {
            id: id.into(),
            friendly_name: None,
            actuators,
            reschedule_delay: Duration::ZERO,
            replicate_changes: true,
        }
    }

    pub fn with_reschedule_delay(mut self, delay: Duration) -> Self {
        self.reschedule_delay = delay;
        self
    }

    pub fn with_replicate_changes(mut self, replicate: bool) -> Self {
        self.replicate_changes = replicate;
        self
    }

    pub fn with_friendly_name(mut self, name: impl Into<String>) -> Self {
        self.friendly_name = Some(name.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.friendly_name.as_deref().unwrap_or(&self.id)
    }
}

/// Whether a reschedule timer is pending
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomState {
    Idle,
    PendingReschedule { timer_id: String },
}

/// A value requested from outside the schedule
#[derive(Debug, Clone)]
pub enum ManualRequest {
    Value(Value),
    Expression(Expression),
}

/// Triggers delivered to a room, one at a time
#[derive(Debug, Clone)]
pub enum RoomEvent {
    /// A scheduling boundary was reached, or startup
    ScheduleTick { send: bool, force_resend: bool },
    /// A reschedule timer fired
    RescheduleTimerFired { timer_id: String },
    /// Manual override
    ManualValue {
        request: ManualRequest,
        force_resend: bool,
        reschedule_delay: Option<Duration>,
    },
    /// An actuator reported a value it was set to externally
    ValueChanged { actuator: String, value: Value },
    /// Re-evaluate the schedule after `delay`
    Reschedule { delay: Duration, restart: bool },
}

/// Collaborators consulted during a transition
#[derive(Clone, Copy)]
pub struct RoomContext<'a> {
    pub evaluator: &'a dyn Evaluator,
    pub validator: &'a dyn ValueValidator,
}

/// A controlled room
#[derive(Debug, Clone)]
pub struct Room {
    pub config: Arc<RoomConfig>,
    pub schedule: Option<Arc<Schedule>>,
    pub state: RoomState,
    /// Last value resolved from the schedule
    pub scheduled_value: Option<Value>,
    /// Last value pushed to the actuators
    pub wanted_value: Option<Value>,
    timer_generation: u64,
}

impl Room {
    pub fn new(config: RoomConfig, schedule: Option<Arc<Schedule>>) -> Self {
        Self {
            config: Arc::new(config),
            schedule,
            state: RoomState::Idle,
            scheduled_value: None,
            wanted_value: None,
            timer_generation: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    /// Seed the last scheduled value, e.g. from a mirror after restart
    pub fn with_scheduled_value(&self, value: Option<Value>) -> Room {
        Room {
            scheduled_value: value,
            ..self.clone()
        }
    }

    pub fn reschedule_timer_id(&self) -> Option<&str> {
        match &self.state {
            RoomState::PendingReschedule { timer_id } => Some(timer_id),
            RoomState::Idle => None,
        }
    }

    /// Side-effect-free resolution of the room's schedule at `at`
    pub fn resolve_now(&self, ctx: &RoomContext<'_>, at: NaiveDateTime) -> ResolveOutcome {
        match &self.schedule {
            Some(schedule) => resolve(schedule, at, ctx.evaluator, ctx.validator),
            None => ResolveOutcome::NoResult,
        }
    }

    /// Process an event, returning the new room and effects to execute
    pub fn transition(
        &self,
        event: RoomEvent,
        ctx: &RoomContext<'_>,
        clock: &impl Clock,
    ) -> (Room, Vec<Effect>) {
        match event {
            RoomEvent::ScheduleTick { send, force_resend } => {
                self.apply_schedule(send, force_resend, ctx, clock)
            }

            RoomEvent::RescheduleTimerFired { timer_id } => match &self.state {
                RoomState::PendingReschedule { timer_id: armed } if *armed == timer_id => {
                    tracing::debug!(room = self.id(), "re-schedule timer fired");
                    let room = Room {
                        state: RoomState::Idle,
                        scheduled_value: None,
                        ..self.clone()
                    };
                    room.apply_schedule(true, false, ctx, clock)
                }
                _ => {
                    tracing::debug!(room = self.id(), %timer_id, "ignoring stale re-schedule timer");
                    (self.clone(), vec![])
                }
            },

            RoomEvent::ManualValue {
                request,
                force_resend,
                reschedule_delay,
            } => self.set_value_manually(request, force_resend, reschedule_delay, ctx, clock),

            RoomEvent::ValueChanged { actuator, value } => self.value_changed(&actuator, value),

            RoomEvent::Reschedule { delay, restart } => self.start_reschedule_timer(delay, restart),
        }
    }

    /// Cancel the pending reschedule timer; `None` when nothing was armed
    pub fn cancel_reschedule_timer(&self) -> Option<(Room, Vec<Effect>)> {
        let RoomState::PendingReschedule { timer_id } = &self.state else {
            return None;
        };
        let effects = vec![
            Effect::CancelTimer {
                id: timer_id.clone(),
            },
            Effect::Emit(Event::RescheduleCancelled {
                room: self.id().to_string(),
            }),
        ];
        Some((
            Room {
                state: RoomState::Idle,
                ..self.clone()
            },
            effects,
        ))
    }

    fn apply_schedule(
        &self,
        send: bool,
        force_resend: bool,
        ctx: &RoomContext<'_>,
        clock: &impl Clock,
    ) -> (Room, Vec<Effect>) {
        if matches!(self.state, RoomState::PendingReschedule { .. }) {
            tracing::debug!(room = self.id(), "not scheduling now due to a running re-schedule timer");
            return (self.clone(), vec![]);
        }

        let resolution = match self.resolve_now(ctx, clock.local_now()) {
            ResolveOutcome::Resolved(resolution) => resolution,
            ResolveOutcome::Aborted => {
                return (
                    self.clone(),
                    vec![Effect::Emit(Event::ScheduleAborted {
                        room: self.id().to_string(),
                    })],
                );
            }
            ResolveOutcome::NoResult => {
                return (
                    self.clone(),
                    vec![Effect::Emit(Event::ScheduleEmpty {
                        room: self.id().to_string(),
                    })],
                );
            }
        };

        let value = resolution.value;
        if self.scheduled_value.as_ref() == Some(&value) && !force_resend {
            tracing::debug!(room = self.id(), %value, "result didn't change, not setting it again");
            return (self.clone(), vec![]);
        }

        let room = Room {
            scheduled_value: Some(value.clone()),
            ..self.clone()
        };
        let mut effects = vec![
            Effect::MirrorScheduledValue {
                room: self.id().to_string(),
                value: value.clone(),
            },
            Effect::Emit(Event::ValueScheduled {
                room: self.id().to_string(),
                value: value.clone(),
                rule: resolution.rule.to_string(),
            }),
        ];
        if !send {
            return (room, effects);
        }

        let (room, pushed) = room.set_value(value, ValueOrigin::Scheduled, force_resend);
        effects.extend(pushed);
        (room, effects)
    }

    fn set_value(&self, value: Value, origin: ValueOrigin, force_resend: bool) -> (Room, Vec<Effect>) {
        let effects = vec![
            Effect::SetValue {
                room: self.id().to_string(),
                value: value.clone(),
                force_resend,
                origin,
            },
            Effect::Emit(Event::ValueSet {
                room: self.id().to_string(),
                value: value.clone(),
                origin,
            }),
        ];
        (
            Room {
                wanted_value: Some(value),
                ..self.clone()
            },
            effects,
        )
    }

    fn set_value_manually(
        &self,
        request: ManualRequest,
        force_resend: bool,
        reschedule_delay: Option<Duration>,
        ctx: &RoomContext<'_>,
        clock: &impl Clock,
    ) -> (Room, Vec<Effect>) {
        let value = match self.manual_candidate(request, ctx, clock) {
            Ok(value) => value,
            Err(reason) => {
                tracing::warn!(room = self.id(), %reason, "ignoring manual value");
                return (
                    self.clone(),
                    vec![Effect::Emit(Event::ValueRejected {
                        room: self.id().to_string(),
                        reason,
                    })],
                );
            }
        };

        let (room, mut effects) = self.set_value(value, ValueOrigin::Manual, force_resend);
        let delay = reschedule_delay.unwrap_or(self.config.reschedule_delay);
        let (room, timer_effects) = room.start_reschedule_timer(delay, true);
        effects.extend(timer_effects);
        (room, effects)
    }

    fn manual_candidate(
        &self,
        request: ManualRequest,
        ctx: &RoomContext<'_>,
        clock: &impl Clock,
    ) -> Result<Value, String> {
        let expression = match request {
            ManualRequest::Value(value) => {
                return ctx.validator.validate(&value).map_err(|e| e.to_string());
            }
            ManualRequest::Expression(expression) => expression,
        };

        let evaluated = ctx
            .evaluator
            .evaluate(&expression)
            .map_err(|e| e.to_string())?;
        tracing::debug!(room = self.id(), %expression, ?evaluated, "evaluated manual expression");

        match evaluated {
            Some(ResultValue::Final(value)) => {
                ctx.validator.validate(&value).map_err(|e| e.to_string())
            }
            Some(ResultValue::IncludeSchedule(schedule)) => {
                resolve(&schedule, clock.local_now(), ctx.evaluator, ctx.validator)
                    .into_resolution()
                    .map(|resolution| resolution.value)
                    .ok_or_else(|| format!("{} produced no value", schedule))
            }
            Some(other) => Err(format!("expression {} evaluated to {}", expression, other)),
            None => Err(format!("expression {} produced nothing", expression)),
        }
    }

    fn value_changed(&self, actuator: &str, value: Value) -> (Room, Vec<Effect>) {
        tracing::debug!(room = self.id(), actuator, %value, "value changed externally");

        let mut effects = Vec::new();
        if self.config.replicate_changes && self.config.actuators.len() > 1 {
            effects.push(Effect::SetValue {
                room: self.id().to_string(),
                value: value.clone(),
                force_resend: false,
                origin: ValueOrigin::Replicated,
            });
        }

        let (room, timer_effects) = if self.wanted_value.as_ref() == Some(&value) {
            self.cancel_reschedule_timer()
                .unwrap_or_else(|| (self.clone(), vec![]))
        } else if !self.config.reschedule_delay.is_zero() {
            self.start_reschedule_timer(self.config.reschedule_delay, true)
        } else {
            (self.clone(), vec![])
        };
        effects.extend(timer_effects);
        (room, effects)
    }

    /// Arm a reschedule timer; an armed one is only replaced when `restart` is set
    fn start_reschedule_timer(&self, delay: Duration, restart: bool) -> (Room, Vec<Effect>) {
        let (mut room, mut effects) = match self.cancel_reschedule_timer() {
            Some(_) if !restart => {
                tracing::debug!(room = self.id(), "re-schedule timer running already, starting no second one");
                return (self.clone(), vec![]);
            }
            Some(cancelled) => cancelled,
            None => (self.clone(), vec![]),
        };

        room.timer_generation += 1;
        let timer_id = format!("room:{}:reschedule:{}", room.id(), room.timer_generation);
        room.state = RoomState::PendingReschedule {
            timer_id: timer_id.clone(),
        };
        effects.push(Effect::SetTimer {
            id: timer_id,
            duration: delay,
        });
        effects.push(Effect::Emit(Event::RescheduleArmed {
            room: room.id().to_string(),
            delay,
        }));
        (room, effects)
    }
}

#[cfg(test)]
#[path = "room_tests.rs"]
mod tests;
