//! Scheduling specs
//!
//! A room follows its schedule at every boundary and never re-sends a value
//! its devices already have.

use crate::prelude::*;

pub const LIVING: &str = r#"
actor_type = { type = "numeric", min = 5, max = 30 }
reschedule_delay = "30m"

[schedule_snippets]
party = [{ v = 23 }]

[rooms.living]
actors = ["trv-1", "trv-2"]
schedule = [
    { name = "day", start = "06:00", end = "22:00", v = 21 },
    { name = "night", v = 16 },
]
"#;

#[tokio::test]
async fn startup_applies_the_current_value() {
    let mut home = Home::new(LIVING, "living", at("2026-10-14 05:30"));

    home.runtime.startup().await;

    assert_eq!(home.pushed(0), ints(&[16]));
    assert_eq!(home.pushed(1), ints(&[16]));
    assert_eq!(home.mirror.value("living"), Some(Value::Int(16)));
    assert_eq!(home.events(), vec!["room:value:scheduled", "room:value:set"]);
}

#[tokio::test]
async fn boundaries_switch_the_value() {
    let mut home = Home::new(LIVING, "living", at("2026-10-14 05:30"))
        .started()
        .await;

    home.wait(Duration::from_secs(30 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[16, 21]));

    home.wait(Duration::from_secs(23 * 60 * 60)).await;
    similar_asserts::assert_eq!(home.pushed(0), ints(&[16, 21, 16]));
    similar_asserts::assert_eq!(home.pushed(1), ints(&[16, 21, 16]));
}

#[tokio::test]
async fn unchanged_value_is_pushed_once() {
    let mut home = Home::new(LIVING, "living", at("2026-10-14 12:00"))
        .started()
        .await;
    let tick = |force_resend| RoomEvent::ScheduleTick {
        send: true,
        force_resend,
    };

    home.send(tick(false)).await;
    home.send(tick(false)).await;
    assert_eq!(home.pushed(0), ints(&[21]));
    assert!(home.events().is_empty());

    home.send(tick(true)).await;
    assert_eq!(home.pushed(0), ints(&[21, 21]));
}

#[tokio::test]
async fn restart_does_not_resend_a_mirrored_value() {
    let mirror = rk_adapters::FakeMirror::new().with_value("living", Value::Int(21));
    let mut home = Home::with_mirror(LIVING, "living", at("2026-10-14 12:00"), mirror);

    home.runtime.startup().await;

    assert!(home.pushed(0).is_empty());
    assert!(home.events().is_empty());

    home.wait(Duration::from_secs(10 * 60 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[16]));
}

#[tokio::test]
async fn startup_can_record_without_sending() {
    let toml = format!("reschedule_at_startup = false\n{}", LIVING);
    let mut home = Home::new(&toml, "living", at("2026-10-14 05:30"));

    home.runtime.startup().await;

    assert!(home.pushed(0).is_empty());
    assert_eq!(home.mirror.value("living"), Some(Value::Int(16)));
    assert_eq!(home.events(), vec!["room:value:scheduled"]);

    home.wait(Duration::from_secs(30 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21]));
}

#[tokio::test]
async fn resolve_now_has_no_side_effects() {
    let mut home = Home::new(LIVING, "living", at("2026-10-14 12:00"))
        .started()
        .await;

    let outcome = home.runtime.resolve_now(Some(at("2026-10-14 23:00")));

    assert_eq!(outcome.value(), Some(&Value::Int(16)));
    assert_eq!(home.pushed(0), ints(&[21]));
    assert!(home.events().is_empty());
}
