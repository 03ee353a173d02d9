// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Raw configuration types that mirror the TOML structure exactly.
//!
//! These types are used for parsing only. The loader converts them into
//! rooms and rule trees after validation.

use rk_core::Value;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Top-level configuration file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawConfig {
    /// Actor type shared by every room
    pub actor_type: RawActorType,
    /// Default delay before a manual value is overridden by the schedule
    #[serde(with = "humantime_serde")]
    pub reschedule_delay: Option<Duration>,
    /// Default for pushing drifted values to a room's other actuators
    pub replicate_changes: Option<bool>,
    /// Whether the first schedule application sends the value
    pub reschedule_at_startup: Option<bool>,
    /// Whether control requests may carry expressions
    pub expressions_from_events: Option<bool>,
    /// Rules placed before every room's own schedule
    pub schedule_prepend: Vec<RawRule>,
    /// Rules placed after every room's own schedule
    pub schedule_append: Vec<RawRule>,
    /// Named rule lists expressions can include
    pub schedule_snippets: BTreeMap<String, Vec<RawRule>>,
    pub rooms: BTreeMap<String, RawRoom>,
}

/// Actor type, either by name or as a table with parameters
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawActorType {
    Name(String),
    Table {
        #[serde(rename = "type")]
        kind: String,
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
}

impl Default for RawActorType {
    fn default() -> Self {
        RawActorType::Name("generic".to_string())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRoom {
    pub friendly_name: Option<String>,
    /// Actuator ids
    pub actors: Vec<String>,
    #[serde(with = "humantime_serde")]
    pub reschedule_delay: Option<Duration>,
    pub replicate_changes: Option<bool>,
    pub schedule: Vec<RawRule>,
}

/// One rule of a schedule
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RawRule {
    pub name: Option<String>,
    /// Window start, `HH:MM[:SS]`
    pub start: Option<String>,
    /// Window end, `HH:MM[:SS]`
    pub end: Option<String>,
    /// ISO weekdays, e.g. `"1-5,7"`
    pub weekdays: Option<String>,
    /// Months, e.g. `"1-3,12"`
    pub months: Option<String>,
    #[serde(alias = "v")]
    pub value: Option<Value>,
    #[serde(alias = "x")]
    pub expression: Option<String>,
    /// Nested rules; makes this a sub-schedule rule
    pub rules: Option<Vec<RawRule>>,
}

impl RawRule {
    pub fn has_window(&self) -> bool {
        self.start.is_some() || self.end.is_some() || self.weekdays.is_some() || self.months.is_some()
    }
}
