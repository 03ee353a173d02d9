//! Precedence specs
//!
//! The most specific rule wins; it may hand over to its ancestors by
//! producing nothing.

use crate::prelude::*;

const CONFIG: &str = r#"
actor_type = { type = "numeric", min = 5, max = 30 }

[rooms.office]
actors = ["trv"]

[[rooms.office.schedule]]
name = "workdays"
weekdays = "1-5"
v = 20
rules = [
    { name = "morning", start = "06:00", end = "09:00", x = "Result(22)" },
    { name = "lunch", start = "12:00", end = "13:00", x = "None" },
    { name = "meeting", start = "15:00", end = "16:00", x = "Skip()" },
    { name = "boost", start = "18:00", end = "19:00", v = 40 },
]

[[rooms.office.schedule]]
name = "fallback"
v = 15
"#;

#[test]
fn innermost_rule_overrides_its_ancestors() {
    let config = config(CONFIG);

    assert_eq!(
        resolve(&config, "office", at("2026-10-14 07:00")),
        Some(Value::Int(22))
    );
}

#[test]
fn rule_producing_nothing_defers_to_its_ancestor() {
    let config = config(CONFIG);

    let resolution = resolve_with(&config, "office", at("2026-10-14 12:30"), &config.evaluator())
        .into_resolution()
        .unwrap();
    assert_eq!(resolution.value, Value::Int(20));
    assert_eq!(resolution.rule.to_string(), "lunch");
}

#[test]
fn skip_drops_the_whole_path() {
    let config = config(CONFIG);

    assert_eq!(
        resolve(&config, "office", at("2026-10-14 15:30")),
        Some(Value::Int(15))
    );
}

#[test]
fn invalid_value_is_skipped() {
    let config = config(CONFIG);

    // 40 is above the numeric maximum
    assert_eq!(
        resolve(&config, "office", at("2026-10-14 18:30")),
        Some(Value::Int(15))
    );
}

#[test]
fn windows_outside_their_weekdays_do_not_match() {
    let config = config(CONFIG);

    // 2026-10-17 is a Saturday
    assert_eq!(
        resolve(&config, "office", at("2026-10-17 07:00")),
        Some(Value::Int(15))
    );
}

#[test]
fn resolution_is_deterministic() {
    let config = config(CONFIG);
    let when = at("2026-10-14 07:00");

    let first = resolve(&config, "office", when);
    for _ in 0..5 {
        assert_eq!(resolve(&config, "office", when), first);
    }
}

#[test]
fn identical_expressions_are_evaluated_once_per_run() {
    let config = config(
        r#"
[rooms.office]
actors = ["trv"]
schedule = [{ x = "Add(1)" }, { x = "Add(1)" }, { v = 20 }]
"#,
    );
    let evaluator = Recording::new(&config);

    let outcome = resolve_with(&config, "office", at("2026-10-14 12:00"), &evaluator);

    assert_eq!(outcome.value(), Some(&Value::Int(22)));
    assert_eq!(evaluator.calls(), vec!["Add(1)".to_string()]);
}
