//! Composition specs
//!
//! Values of independent rules add up until a final value closes the sum.

use crate::prelude::*;

const NOON: &str = "2026-10-14 12:00";

fn room(schedule: &str) -> String {
    format!(
        r#"
[schedule_snippets]
party = [{{ v = 23 }}]

[rooms.office]
actors = ["trv"]
schedule = {schedule}
"#
    )
}

#[test]
fn accumulated_value_is_closed_by_a_final_one() {
    let config = config(&room(r#"[{ x = "Add(2)" }, { v = 3 }]"#));

    assert_eq!(resolve(&config, "office", at(NOON)), Some(Value::Int(5)));
}

#[test]
fn accumulation_without_a_final_value_resolves_nothing() {
    let config = config(&room(r#"[{ x = "Add(2)" }, { x = "Add(0.5)" }]"#));

    let outcome = resolve_with(&config, "office", at(NOON), &config.evaluator());
    assert!(matches!(outcome, ResolveOutcome::NoResult));
}

#[test]
fn abort_discards_the_accumulated_value() {
    let config = config(&room(r#"[{ x = "Add(2)" }, { x = "Abort()" }, { v = 3 }]"#));

    let outcome = resolve_with(&config, "office", at(NOON), &config.evaluator());
    assert!(matches!(outcome, ResolveOutcome::Aborted));
}

#[test]
fn unsummable_contribution_is_dropped() {
    let config = config(&room(r#"[{ x = "Add(1)" }, { v = "on" }, { v = 4 }]"#));

    assert_eq!(resolve(&config, "office", at(NOON)), Some(Value::Int(5)));
}

#[test]
fn included_snippet_is_explored_in_place() {
    let config = config(&room(
        r#"[{ x = "Add(1)" }, { x = "IncludeSchedule(\"party\")" }, { v = 16 }]"#,
    ));

    assert_eq!(resolve(&config, "office", at(NOON)), Some(Value::Int(24)));
}

const TREE: &str = r#"[
    { name = "A", rules = [
        { name = "B", rules = [
            { name = "C", x = "BREAK" },
            { name = "D", x = "Add(100)" },
        ] },
        { name = "E", v = 2 },
    ] },
    { name = "F", v = 3 },
]"#;

#[test]
fn break_prunes_the_siblings_below_the_kept_prefix() {
    // [A,B,C] keeps the prefix [A,B]: [A,B,D] is pruned, [A,E] is not
    let config = config(&room(&TREE.replace("BREAK", "Break(1)")));

    let outcome = resolve_with(&config, "office", at(NOON), &config.evaluator());
    let resolution = outcome.into_resolution().unwrap();
    assert_eq!(resolution.value, Value::Int(2));
    assert_eq!(resolution.rule.to_string(), "E");
}

#[test]
fn deeper_break_prunes_more_levels() {
    // [A,B,C] keeps the prefix [A]: everything below A is pruned
    let config = config(&room(&TREE.replace("BREAK", "Break(2)")));

    assert_eq!(resolve(&config, "office", at(NOON)), Some(Value::Int(3)));
}
