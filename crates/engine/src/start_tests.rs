// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use rk_adapters::{FakeActuator, FakeMirror};
use rk_config::load_config;
use rk_core::{SystemClock, Value};
use std::collections::BTreeMap;
use std::time::Duration;

const CONFIG: &str = r#"
actor_type = { type = "numeric", min = 5, max = 30 }

[rooms.office]
actors = ["trv-office"]
schedule = [{ v = 21 }]

[rooms.hall]
actors = ["trv-hall-1", "trv-hall-2"]
schedule = [{ v = 17 }]
"#;

struct Devices(BTreeMap<String, FakeActuator>);

impl Devices {
    fn factory(&mut self) -> impl FnMut(&str) -> Arc<dyn Actuator> + '_ {
        move |id| {
            let actuator = FakeActuator::new(id);
            self.0.insert(id.to_string(), actuator.clone());
            Arc::new(actuator) as Arc<dyn Actuator>
        }
    }
}

async fn collect_events(rx: &mut mpsc::UnboundedReceiver<Event>, n: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..n {
        let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for an event")
            .expect("event channel closed");
        events.push(event);
    }
    events
}

#[tokio::test]
async fn starts_every_configured_room() {
    let config = load_config(CONFIG).unwrap();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut devices = Devices(BTreeMap::new());

    let started = start_rooms(
        &config,
        FakeMirror::new(),
        SystemClock,
        Some(tx),
        devices.factory(),
    );

    assert_eq!(started.tasks.len(), 2);
    let ids: Vec<&str> = started.controller.rooms().map(|room| room.id()).collect();
    assert_eq!(ids, vec!["hall", "office"]);

    // Each room schedules and pushes once
    let events = collect_events(&mut rx, 4).await;
    let set: Vec<&str> = events
        .iter()
        .filter(|event| event.name() == "room:value:set")
        .map(|event| event.room())
        .collect();
    assert_eq!(set.len(), 2);

    assert_eq!(devices.0.len(), 3);
    assert_eq!(devices.0["trv-hall-1"].sent(), vec![Value::Int(17)]);
    assert_eq!(devices.0["trv-hall-2"].sent(), vec![Value::Int(17)]);
    assert_eq!(devices.0["trv-office"].sent(), vec![Value::Int(21)]);

    started.controller.shutdown().await;
    for task in started.tasks {
        task.await.unwrap();
    }
}

#[tokio::test]
async fn startup_without_reschedule_only_records_the_value() {
    let config = load_config(&format!("reschedule_at_startup = false\n{}", CONFIG)).unwrap();
    let mirror = FakeMirror::new();
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut devices = Devices(BTreeMap::new());

    let started = start_rooms(&config, mirror.clone(), SystemClock, Some(tx), devices.factory());

    let events = collect_events(&mut rx, 2).await;
    assert!(events
        .iter()
        .all(|event| event.name() == "room:value:scheduled"));
    assert!(devices.0.values().all(|actuator| actuator.sent().is_empty()));

    started.controller.shutdown().await;
    for task in started.tasks {
        task.await.unwrap();
    }
    assert_eq!(mirror.value("office"), Some(Value::Int(21)));
    assert_eq!(mirror.value("hall"), Some(Value::Int(17)));
}

#[tokio::test]
async fn mirrored_value_suppresses_an_unchanged_push() {
    let config = load_config(CONFIG).unwrap();
    let mirror = FakeMirror::new().with_value("office", Value::Int(21));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut devices = Devices(BTreeMap::new());

    let started = start_rooms(&config, mirror, SystemClock, Some(tx), devices.factory());

    // Only the hall has something new to schedule
    let events = collect_events(&mut rx, 2).await;
    assert!(events.iter().all(|event| event.room() == "hall"));

    started.controller.shutdown().await;
    for task in started.tasks {
        task.await.unwrap();
    }
    assert!(devices.0["trv-office"].sent().is_empty());
}
