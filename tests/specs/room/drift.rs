//! Drift specs
//!
//! A device turned by hand is copied to its siblings and, after the
//! reschedule delay, brought back to the schedule.

use crate::prelude::*;
use crate::room_schedule::LIVING;

async fn living(toml: &str) -> Home {
    Home::new(toml, "living", at("2026-10-14 12:00"))
        .started()
        .await
}

#[tokio::test]
async fn drift_is_replicated_and_later_corrected() {
    let mut home = living(LIVING).await;

    home.turn(0, 19).await;
    assert_eq!(home.pushed(1), ints(&[21, 19]));
    assert_eq!(home.events(), vec!["room:reschedule:armed"]);
    // The drifted value is not what the room wants
    assert_eq!(home.runtime.wanted_value(), Some(&Value::Int(21)));

    home.wait(Duration::from_secs(30 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21, 21]));
    assert_eq!(home.pushed(1), ints(&[21, 19, 21]));
}

#[tokio::test]
async fn agreement_cancels_the_pending_correction() {
    let mut home = living(LIVING).await;

    home.turn(0, 19).await;
    home.turn(0, 21).await;
    assert_eq!(
        home.events(),
        vec!["room:reschedule:armed", "room:reschedule:cancelled"]
    );

    home.wait(Duration::from_secs(60 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21]));
    assert_eq!(home.pushed(1), ints(&[21, 19, 21]));
}

#[tokio::test]
async fn replication_can_be_disabled() {
    let toml = LIVING.replace(
        "actors = [\"trv-1\", \"trv-2\"]",
        "actors = [\"trv-1\", \"trv-2\"]\nreplicate_changes = false",
    );
    let mut home = living(&toml).await;

    home.turn(0, 19).await;

    assert_eq!(home.pushed(1), ints(&[21]));
    assert_eq!(home.events(), vec!["room:reschedule:armed"]);
}

#[tokio::test]
async fn drift_stays_without_a_reschedule_delay() {
    let toml = LIVING.replace("reschedule_delay = \"30m\"", "reschedule_delay = \"0s\"");
    let mut home = living(&toml).await;

    home.turn(0, 19).await;
    assert!(home.events().is_empty());

    home.wait(Duration::from_secs(60 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21]));
}

#[tokio::test]
async fn unknown_device_is_ignored() {
    let mut home = living(LIVING).await;

    home.send(RoomEvent::ValueChanged {
        actuator: "ghost".into(),
        value: Value::Int(5),
    })
    .await;

    assert!(home.events().is_empty());
    assert_eq!(home.pushed(1), ints(&[21]));
}

#[tokio::test]
async fn cancelling_an_idle_room_changes_nothing() {
    let home = living(LIVING).await;

    assert!(home.runtime.room().cancel_reschedule_timer().is_none());
}
