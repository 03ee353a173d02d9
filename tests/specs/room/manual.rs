//! Manual override specs
//!
//! A manual value holds until the room's reschedule delay has passed.

use crate::prelude::*;
use crate::room_schedule::LIVING;

const HALF_HOUR: Duration = Duration::from_secs(30 * 60);

async fn living_at(when: &str) -> Home {
    Home::new(LIVING, "living", at(when)).started().await
}

#[tokio::test]
async fn manual_value_reverts_after_the_delay() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.manual(18).await;
    assert_eq!(home.pushed(0), ints(&[21, 18]));
    assert_eq!(home.events(), vec!["room:value:set", "room:reschedule:armed"]);

    home.wait(HALF_HOUR).await;
    assert_eq!(home.pushed(0), ints(&[21, 18, 21]));
    assert_eq!(home.pushed(1), ints(&[21, 18, 21]));
}

#[tokio::test]
async fn boundary_waits_for_the_pending_reschedule() {
    let mut home = living_at("2026-10-14 21:00").await;

    home.send(RoomEvent::ManualValue {
        request: ManualRequest::Value(Value::Int(18)),
        force_resend: false,
        reschedule_delay: Some(Duration::from_secs(2 * 60 * 60)),
    })
    .await;

    // 22:00 passes without a push
    home.wait(Duration::from_secs(90 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21, 18]));

    home.wait(HALF_HOUR).await;
    assert_eq!(home.pushed(0), ints(&[21, 18, 16]));
}

#[tokio::test]
async fn newer_request_restarts_the_delay() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.manual(18).await;
    home.wait(Duration::from_secs(20 * 60)).await;
    home.manual(19).await;
    home.wait(Duration::from_secs(20 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21, 18, 19]));

    home.wait(Duration::from_secs(10 * 60)).await;
    assert_eq!(home.pushed(0), ints(&[21, 18, 19, 21]));
}

#[tokio::test]
async fn zero_delay_returns_to_the_schedule_at_once() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.manual(18).await;
    home.events();
    home.send(RoomEvent::ManualValue {
        request: ManualRequest::Value(Value::Int(19)),
        force_resend: false,
        reschedule_delay: Some(Duration::ZERO),
    })
    .await;
    assert_eq!(
        home.events(),
        vec![
            "room:value:set",
            "room:reschedule:cancelled",
            "room:reschedule:armed"
        ]
    );

    home.wait(Duration::ZERO).await;
    assert_eq!(home.pushed(0), ints(&[21, 18, 19, 21]));
}

#[tokio::test]
async fn invalid_manual_value_is_rejected() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.manual(40).await;

    assert_eq!(home.pushed(0), ints(&[21]));
    assert_eq!(home.events(), vec!["room:value:rejected"]);
}

#[tokio::test]
async fn manual_expression_may_include_a_snippet() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.send(RoomEvent::ManualValue {
        request: ManualRequest::Expression(Expression::new("IncludeSchedule(\"party\")")),
        force_resend: false,
        reschedule_delay: None,
    })
    .await;

    assert_eq!(home.pushed(0), ints(&[21, 23]));
    assert_eq!(home.runtime.wanted_value(), Some(&Value::Int(23)));
}

#[tokio::test]
async fn manual_values_are_not_mirrored() {
    let mut home = living_at("2026-10-14 12:00").await;

    home.manual(18).await;

    assert_eq!(home.mirror.value("living"), Some(Value::Int(21)));
}
