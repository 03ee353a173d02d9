// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Starting every room of a loaded configuration

use crate::{spawn_room, Controller, RoomDeps, RoomRuntime};
use rk_adapters::{Actuator, ValueMirror};
use rk_config::Config;
use rk_core::{Clock, Event, Room};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Running rooms and the controller addressing them
pub struct Started {
    pub controller: Controller,
    pub tasks: Vec<JoinHandle<()>>,
}

/// Spawn one task per configured room.
///
/// `actuator` builds the adapter for each actuator id; `events`, if set,
/// receives the events of every room.
pub fn start_rooms<M, C, F>(
    config: &Config,
    mirror: M,
    clock: C,
    events: Option<mpsc::UnboundedSender<Event>>,
    mut actuator: F,
) -> Started
where
    M: ValueMirror,
    C: Clock + 'static,
    F: FnMut(&str) -> Arc<dyn Actuator>,
{
    let evaluator = Arc::new(config.evaluator());
    let validator = Arc::new(config.actor_type.clone());
    let mut controller = Controller::new(config.expressions_from_events);
    let mut tasks = Vec::with_capacity(config.rooms.len());

    for def in &config.rooms {
        let deps = RoomDeps {
            actuators: def.config.actuators.iter().map(|id| actuator(id.as_str())).collect(),
            mirror: mirror.clone(),
            evaluator: evaluator.clone(),
            validator: validator.clone(),
            events: events.clone(),
        };
        let room = Room::new(def.config.clone(), Some(Arc::clone(&def.schedule)));
        let runtime = RoomRuntime::new(room, deps, clock.clone())
            .with_scheduling_times(def.scheduling_times.iter().copied())
            .with_reschedule_at_startup(config.reschedule_at_startup);

        tracing::debug!(
            room = %def.config.id,
            actuators = def.config.actuators.len(),
            "spawning room"
        );
        let (handle, task) = spawn_room(runtime);
        controller.add_room(handle);
        tasks.push(task);
    }

    Started { controller, tasks }
}

#[cfg(test)]
#[path = "start_tests.rs"]
mod tests;
