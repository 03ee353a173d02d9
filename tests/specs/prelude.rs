//! Shared fixtures for behavioral specs

#![allow(dead_code)]

pub use chrono::NaiveDateTime;
pub use rk_core::{Event, Expression, ManualRequest, ResolveOutcome, RoomEvent, Value};
pub use std::time::Duration;

use rk_adapters::{Actuator, FakeActuator, FakeMirror};
use rk_config::{load_config, BuiltinEvaluator, Config};
use rk_core::{Clock, EvaluationError, Evaluator, FakeClock, ResultValue, Room};
use rk_engine::{RoomDeps, RoomRuntime};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Parse `YYYY-MM-DD HH:MM`; 2026-10-14 is a Wednesday
pub fn at(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
}

pub fn config(toml: &str) -> Config {
    load_config(toml).unwrap_or_else(|e| panic!("invalid config: {e}\n{toml}"))
}

/// Built-in evaluator that records every expression it evaluates
#[derive(Clone)]
pub struct Recording {
    inner: BuiltinEvaluator,
    calls: Arc<Mutex<Vec<String>>>,
}

impl Recording {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: config.evaluator(),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Evaluator for Recording {
    fn evaluate(&self, expression: &Expression) -> Result<Option<ResultValue>, EvaluationError> {
        self.calls
            .lock()
            .unwrap()
            .push(expression.source().to_string());
        self.inner.evaluate(expression)
    }
}

/// Resolve `room` of `config` at `when`
pub fn resolve_with(
    config: &Config,
    room: &str,
    when: NaiveDateTime,
    evaluator: &dyn Evaluator,
) -> ResolveOutcome {
    let def = config.room(room).unwrap();
    rk_core::resolve(&def.schedule, when, evaluator, &config.actor_type)
}

pub fn resolve(config: &Config, room: &str, when: NaiveDateTime) -> Option<Value> {
    resolve_with(config, room, when, &config.evaluator())
        .value()
        .cloned()
}

/// One configured room running on a fake clock with fake devices
pub struct Home {
    pub runtime: RoomRuntime<FakeMirror, FakeClock>,
    pub devices: Vec<FakeActuator>,
    pub mirror: FakeMirror,
    pub clock: FakeClock,
    events: mpsc::UnboundedReceiver<Event>,
}

impl Home {
    pub fn new(toml: &str, room: &str, start: NaiveDateTime) -> Self {
        Self::with_mirror(toml, room, start, FakeMirror::new())
    }

    pub fn with_mirror(toml: &str, room: &str, start: NaiveDateTime, mirror: FakeMirror) -> Self {
        let config = config(toml);
        let def = config.room(room).unwrap();
        let devices: Vec<FakeActuator> = def
            .config
            .actuators
            .iter()
            .map(FakeActuator::new)
            .collect();
        let clock = FakeClock::at(start);
        let (tx, events) = mpsc::unbounded_channel();
        let deps = RoomDeps {
            actuators: devices
                .iter()
                .map(|d| Arc::new(d.clone()) as Arc<dyn Actuator>)
                .collect(),
            mirror: mirror.clone(),
            evaluator: Arc::new(config.evaluator()),
            validator: Arc::new(config.actor_type.clone()),
            events: Some(tx),
        };
        let runtime = RoomRuntime::new(
            Room::new(def.config.clone(), Some(Arc::clone(&def.schedule))),
            deps,
            clock.clone(),
        )
        .with_scheduling_times(def.scheduling_times.iter().copied())
        .with_reschedule_at_startup(config.reschedule_at_startup);

        Self {
            runtime,
            devices,
            mirror,
            clock,
            events,
        }
    }

    /// Start the room and forget the startup events
    pub async fn started(mut self) -> Self {
        self.runtime.startup().await;
        self.events();
        self
    }

    /// Let `duration` pass, firing every timer that falls due on the way
    pub async fn wait(&mut self, duration: Duration) {
        let end = self.clock.now() + duration;
        while let Some(deadline) = self.runtime.next_deadline().filter(|d| *d <= end) {
            let now = self.clock.now();
            if deadline > now {
                self.clock.advance(deadline - now);
            }
            self.runtime.poll_timers().await;
        }
        let now = self.clock.now();
        if end > now {
            self.clock.advance(end - now);
        }
    }

    pub async fn send(&mut self, event: RoomEvent) {
        self.runtime.handle(event).await;
    }

    pub async fn manual(&mut self, value: impl Into<Value>) {
        self.send(RoomEvent::ManualValue {
            request: ManualRequest::Value(value.into()),
            force_resend: false,
            reschedule_delay: None,
        })
        .await;
    }

    /// A device was turned by hand
    pub async fn turn(&mut self, device: usize, value: impl Into<Value>) {
        let value = value.into();
        self.devices[device].set_current(value.clone());
        let actuator = self.runtime.room().config.actuators[device].clone();
        self.send(RoomEvent::ValueChanged { actuator, value }).await;
    }

    /// Values each device actually received
    pub fn pushed(&self, device: usize) -> Vec<Value> {
        self.devices[device].sent()
    }

    /// Names of the events emitted since the last call
    pub fn events(&mut self) -> Vec<&'static str> {
        let mut names = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            names.push(event.name());
        }
        names
    }
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().map(|v| Value::Int(*v)).collect()
}
