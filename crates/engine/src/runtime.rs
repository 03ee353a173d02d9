// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Runtime driving a single room

use crate::boundary::until_next_boundary;
use crate::Executor;
use chrono::{NaiveDateTime, NaiveTime};
use rk_adapters::{Actuator, ValueMirror};
use rk_core::{
    Clock, Evaluator, Event, ResolveOutcome, Room, RoomContext, RoomEvent, Scheduler, Value,
    ValueValidator,
};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Adapters and collaborators a room runtime needs
pub struct RoomDeps<M> {
    pub actuators: Vec<Arc<dyn Actuator>>,
    pub mirror: M,
    pub evaluator: Arc<dyn Evaluator>,
    pub validator: Arc<dyn ValueValidator>,
    /// Receives every emitted event, if set
    pub events: Option<mpsc::UnboundedSender<Event>>,
}

/// Owns one room and applies its transitions
pub struct RoomRuntime<M, C: Clock> {
    room: Room,
    executor: Executor<M, C>,
    scheduler: Arc<Mutex<Scheduler>>,
    evaluator: Arc<dyn Evaluator>,
    validator: Arc<dyn ValueValidator>,
    clock: C,
    scheduling_times: BTreeSet<NaiveTime>,
    reschedule_at_startup: bool,
}

impl<M, C> RoomRuntime<M, C>
where
    M: ValueMirror,
    C: Clock,
{
    pub fn new(room: Room, deps: RoomDeps<M>, clock: C) -> Self {
        let scheduler = Arc::new(Mutex::new(Scheduler::new()));
        let mut executor = Executor::new(
            deps.actuators,
            deps.mirror,
            Arc::clone(&scheduler),
            clock.clone(),
        );
        if let Some(events) = deps.events {
            executor = executor.with_subscriber(events);
        }
        let scheduling_times = room
            .schedule
            .as_ref()
            .map(|schedule| schedule.scheduling_times())
            .unwrap_or_default();
        Self {
            room,
            executor,
            scheduler,
            evaluator: deps.evaluator,
            validator: deps.validator,
            clock,
            scheduling_times,
            reschedule_at_startup: true,
        }
    }

    /// Add boundaries the schedule tree cannot see, e.g. of included snippets
    pub fn with_scheduling_times(mut self, times: impl IntoIterator<Item = NaiveTime>) -> Self {
        self.scheduling_times.extend(times);
        self
    }

    /// Whether the startup tick sends the value or only records it
    pub fn with_reschedule_at_startup(mut self, send: bool) -> Self {
        self.reschedule_at_startup = send;
        self
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn id(&self) -> &str {
        self.room.id()
    }

    fn boundary_timer_id(&self) -> String {
        format!("room:{}:boundary", self.room.id())
    }

    /// Restore from the mirror, apply the schedule once and arm the first boundary
    pub async fn startup(&mut self) {
        let restored = match self.executor.mirror().load(self.room.id()).await {
            Ok(Some(value)) => match self.validator.validate(&value) {
                Ok(value) => Some(value),
                Err(e) => {
                    tracing::warn!(room = self.room.id(), error = %e, "discarding mirrored value");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(room = self.room.id(), error = %e, "could not restore mirrored value");
                None
            }
        };
        if let Some(value) = &restored {
            tracing::debug!(room = self.room.id(), %value, "restored last scheduled value");
        }
        self.room = self.room.with_scheduled_value(restored);

        tracing::info!(
            room = self.room.id(),
            name = self.room.config.display_name(),
            boundaries = self.scheduling_times.len(),
            "starting room"
        );
        self.handle(RoomEvent::ScheduleTick {
            send: self.reschedule_at_startup,
            force_resend: false,
        })
        .await;
        self.arm_boundary();
    }

    /// Apply one event to the room and execute the resulting effects
    pub async fn handle(&mut self, event: RoomEvent) {
        if let RoomEvent::ValueChanged { actuator, .. } = &event {
            if !self.room.config.actuators.iter().any(|a| a == actuator) {
                tracing::warn!(room = self.room.id(), %actuator, "ignoring value of unknown actuator");
                return;
            }
        }

        let effects = {
            let ctx = RoomContext {
                evaluator: self.evaluator.as_ref(),
                validator: self.validator.as_ref(),
            };
            let (room, effects) = self.room.transition(event, &ctx, &self.clock);
            self.room = room;
            effects
        };
        self.executor.execute_all(effects).await;
    }

    /// Fire every due timer
    pub async fn poll_timers(&mut self) {
        let fired = self
            .scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .fired_timers(self.clock.now());

        let boundary = self.boundary_timer_id();
        for timer_id in fired {
            if timer_id == boundary {
                tracing::debug!(room = self.room.id(), "scheduling boundary reached");
                self.handle(RoomEvent::ScheduleTick {
                    send: true,
                    force_resend: false,
                })
                .await;
                self.arm_boundary();
            } else {
                self.handle(RoomEvent::RescheduleTimerFired { timer_id }).await;
            }
        }
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<std::time::Instant> {
        self.scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .next_deadline()
    }

    /// Side-effect-free resolution, at `at` or now
    pub fn resolve_now(&self, at: Option<NaiveDateTime>) -> ResolveOutcome {
        let ctx = RoomContext {
            evaluator: self.evaluator.as_ref(),
            validator: self.validator.as_ref(),
        };
        self.room
            .resolve_now(&ctx, at.unwrap_or_else(|| self.clock.local_now()))
    }

    /// The value last pushed to the actuators
    pub fn wanted_value(&self) -> Option<&Value> {
        self.room.wanted_value.as_ref()
    }

    fn arm_boundary(&self) {
        let Some(delay) = until_next_boundary(&self.scheduling_times, self.clock.local_now()) else {
            return;
        };
        tracing::debug!(room = self.room.id(), delay_s = delay.as_secs(), "next scheduling boundary");
        self.scheduler
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .set_timer(self.boundary_timer_id(), delay, self.clock.now());
    }
}

#[cfg(test)]
#[path = "runtime_tests.rs"]
mod tests;
