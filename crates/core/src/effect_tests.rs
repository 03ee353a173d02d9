// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    scheduled = { Event::ValueScheduled { room: "r".into(), value: Value::Int(1), rule: "x".into() }, "room:value:scheduled" },
    set = { Event::ValueSet { room: "r".into(), value: Value::Int(1), origin: ValueOrigin::Manual }, "room:value:set" },
    rejected = { Event::ValueRejected { room: "r".into(), reason: "bad".into() }, "room:value:rejected" },
    empty = { Event::ScheduleEmpty { room: "r".into() }, "room:schedule:empty" },
    aborted = { Event::ScheduleAborted { room: "r".into() }, "room:schedule:aborted" },
    armed = { Event::RescheduleArmed { room: "r".into(), delay: Duration::from_secs(60) }, "room:reschedule:armed" },
    cancelled = { Event::RescheduleCancelled { room: "r".into() }, "room:reschedule:cancelled" },
)]
fn event_names(event: Event, name: &str) {
    assert_eq!(event.name(), name);
    assert_eq!(event.room(), "r");
}

#[test]
fn event_serializes_with_origin_in_snake_case() {
    let event = Event::ValueSet {
        room: "living".to_string(),
        value: Value::Float(21.5),
        origin: ValueOrigin::Replicated,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "ValueSet": { "room": "living", "value": 21.5, "origin": "replicated" }
        })
    );
}
