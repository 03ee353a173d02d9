// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Configuration loader: converts raw configuration into rooms and rule trees.
//!
//! ```ignore
//! use rk_config::load_config;
//!
//! let config = load_config(toml_content)?;
//! let evaluator = config.evaluator();
//! for room in &config.rooms {
//!     println!("{}: {} rules", room.config.id, room.schedule.rules().len());
//! }
//! ```

use crate::evaluator::{BuiltinEvaluator, SourceError};
use crate::parser::{parse_config, parse_range_list, parse_time_of_day, ParseError};
use crate::types::{RawActorType, RawConfig, RawRoom, RawRule};
use chrono::NaiveTime;
use rk_core::{
    ActorType, Always, ConfigurationError, Expression, ResultValue, Rule, RoomConfig, Schedule,
    TimeWindow,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error reading the configuration file
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{context}: {source}")]
    Parse {
        context: String,
        #[source]
        source: ParseError,
    },

    #[error("{context}: {source}")]
    Configuration {
        context: String,
        #[source]
        source: ConfigurationError,
    },

    #[error("invalid expression {expression:?}: {reason}")]
    Expression { expression: String, reason: String },

    #[error("{context}: {reason}")]
    InvalidRule { context: String, reason: String },

    #[error("schedule snippets include each other: {0}")]
    IncludeCycle(String),

    #[error("room {0} has no actors")]
    NoActors(String),

    #[error("invalid actor type: {0}")]
    InvalidActorType(String),
}

impl From<ParseError> for LoadError {
    fn from(source: ParseError) -> Self {
        LoadError::Parse {
            context: "configuration".to_string(),
            source,
        }
    }
}

/// A room ready to be started
#[derive(Debug, Clone)]
pub struct RoomDef {
    pub config: RoomConfig,
    /// Effective schedule: prepend, room rules, append
    pub schedule: Arc<Schedule>,
    /// Boundaries of the schedule and of every snippet it may include
    pub scheduling_times: BTreeSet<NaiveTime>,
}

/// A loaded configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub actor_type: ActorType,
    pub reschedule_at_startup: bool,
    pub expressions_from_events: bool,
    /// Rooms ordered by id
    pub rooms: Vec<RoomDef>,
    evaluator: BuiltinEvaluator,
}

impl Config {
    pub fn room(&self, id: &str) -> Option<&RoomDef> {
        self.rooms.iter().find(|room| room.config.id == id)
    }

    /// Evaluator aware of the configured schedule snippets
    pub fn evaluator(&self) -> BuiltinEvaluator {
        self.evaluator.clone()
    }
}

/// Parse and load a configuration from TOML content
pub fn load_config(content: &str) -> Result<Config, LoadError> {
    let raw = parse_config(content)?;
    Loader::default().load(raw)
}

/// Read, parse and load a configuration file
pub fn load_config_file(path: &Path) -> Result<Config, LoadError> {
    let content = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_config(&content)
}

#[derive(Default)]
struct Loader {
    /// Interned expressions by source text
    expressions: HashMap<String, Expression>,
}

impl Loader {
    fn load(mut self, raw: RawConfig) -> Result<Config, LoadError> {
        let actor_type = load_actor_type(&raw.actor_type)?;

        let mut snippets = BTreeMap::new();
        for (name, rules) in &raw.schedule_snippets {
            let context = format!("schedule_snippets.{}", name);
            let rules = self.build_rules(rules, &context, name)?;
            snippets.insert(name.clone(), Arc::new(Schedule::from_shared(name, rules)));
        }
        let snippet_times: BTreeSet<NaiveTime> = snippets
            .values()
            .flat_map(|s: &Arc<Schedule>| s.scheduling_times())
            .collect();

        let prepend = self.build_rules(&raw.schedule_prepend, "schedule_prepend", "prepend")?;
        let append = self.build_rules(&raw.schedule_append, "schedule_append", "append")?;

        let mut rooms = Vec::with_capacity(raw.rooms.len());
        for (id, room) in &raw.rooms {
            let config = room_config(id, room, &raw)?;
            let own = self.build_rules(&room.schedule, &format!("rooms.{}.schedule", id), id)?;
            let rules = prepend
                .iter()
                .chain(own.iter())
                .chain(append.iter())
                .cloned()
                .collect();
            let schedule = Arc::new(Schedule::from_shared(id, rules));
            let mut scheduling_times = schedule.scheduling_times();
            scheduling_times.extend(snippet_times.iter().copied());
            rooms.push(RoomDef {
                config,
                schedule,
                scheduling_times,
            });
        }

        let evaluator = BuiltinEvaluator::new(snippets);
        self.check_expressions(&evaluator)?;
        check_include_cycles(&evaluator, raw.schedule_snippets.keys())?;

        tracing::debug!(
            rooms = rooms.len(),
            expressions = self.expressions.len(),
            "configuration loaded"
        );

        Ok(Config {
            actor_type,
            reschedule_at_startup: raw.reschedule_at_startup.unwrap_or(true),
            expressions_from_events: raw.expressions_from_events.unwrap_or(false),
            rooms,
            evaluator,
        })
    }

    fn intern(&mut self, source: &str) -> Expression {
        self.expressions
            .entry(source.to_string())
            .or_insert_with(|| Expression::new(source))
            .clone()
    }

    fn build_rules(
        &mut self,
        raw: &[RawRule],
        context: &str,
        schedule_name: &str,
    ) -> Result<Vec<Arc<Rule>>, LoadError> {
        raw.iter()
            .enumerate()
            .map(|(i, rule)| {
                let context = format!("{}[{}]", context, i);
                let name = format!("{}[{}]", schedule_name, i);
                self.build_rule(rule, &context, &name).map(Arc::new)
            })
            .collect()
    }

    fn build_rule(&mut self, raw: &RawRule, context: &str, fallback_name: &str) -> Result<Rule, LoadError> {
        let mut rule = if raw.has_window() {
            Rule::new(time_window(raw, context)?)
        } else {
            Rule::new(Always)
        };

        if let Some(name) = &raw.name {
            rule = rule.with_name(name.clone());
        }
        if let Some(value) = &raw.value {
            rule = rule.with_value(value.clone());
        }
        if let Some(source) = &raw.expression {
            rule = rule.with_expression(self.intern(source));
        }

        if let Some(children) = &raw.rules {
            if children.is_empty() && raw.value.is_none() && raw.expression.is_none() {
                return Err(LoadError::InvalidRule {
                    context: context.to_string(),
                    reason: "empty rules with neither value nor expression".to_string(),
                });
            }
            let name = raw.name.as_deref().unwrap_or(fallback_name);
            let nested = self.build_rules(children, &format!("{}.rules", context), name)?;
            rule = rule.with_sub_schedule(Arc::new(Schedule::from_shared(name, nested)));
        }

        Ok(rule)
    }

    /// Reject expressions the evaluator can never accept
    fn check_expressions(&self, evaluator: &BuiltinEvaluator) -> Result<(), LoadError> {
        let mut sources: Vec<&String> = self.expressions.keys().collect();
        sources.sort();
        for source in sources {
            match evaluator.parse(source) {
                Ok(_) => {}
                Err(SourceError::Configuration(e)) => {
                    return Err(LoadError::Configuration {
                        context: format!("expression {:?}", source),
                        source: e,
                    })
                }
                Err(e) => {
                    return Err(LoadError::Expression {
                        expression: source.clone(),
                        reason: e.to_string(),
                    })
                }
            }
        }
        Ok(())
    }
}

/// Reject snippets that include themselves, directly or through others
fn check_include_cycles<'a>(
    evaluator: &BuiltinEvaluator,
    names: impl Iterator<Item = &'a String>,
) -> Result<(), LoadError> {
    let graph: BTreeMap<String, Vec<String>> = names
        .filter_map(|name| {
            let mut included = Vec::new();
            collect_includes(evaluator, evaluator.snippet(name)?, &mut included);
            Some((name.clone(), included))
        })
        .collect();

    let mut finished = BTreeSet::new();
    for name in graph.keys() {
        find_cycle(&graph, name, &mut Vec::new(), &mut finished)?;
    }
    Ok(())
}

/// Names of the snippets a schedule includes through constant expressions
fn collect_includes(evaluator: &BuiltinEvaluator, schedule: &Schedule, included: &mut Vec<String>) {
    for rule in schedule.rules() {
        if let Some(expression) = rule.expression() {
            if let Ok(Some(ResultValue::IncludeSchedule(other))) = evaluator.parse(expression.source()) {
                included.push(other.name().to_string());
            }
        }
        if let Some(nested) = rule.sub_schedule() {
            collect_includes(evaluator, nested, included);
        }
    }
}

fn find_cycle<'a>(
    graph: &'a BTreeMap<String, Vec<String>>,
    name: &'a str,
    chain: &mut Vec<&'a str>,
    finished: &mut BTreeSet<&'a str>,
) -> Result<(), LoadError> {
    if finished.contains(name) {
        return Ok(());
    }
    if let Some(start) = chain.iter().position(|n| *n == name) {
        let mut cycle = chain[start..].to_vec();
        cycle.push(name);
        return Err(LoadError::IncludeCycle(cycle.join(" -> ")));
    }
    chain.push(name);
    for next in graph.get(name).into_iter().flatten() {
        find_cycle(graph, next, chain, finished)?;
    }
    chain.pop();
    finished.insert(name);
    Ok(())
}

fn time_window(raw: &RawRule, context: &str) -> Result<TimeWindow, LoadError> {
    let parse_err = |field: &str| {
        let context = format!("{}.{}", context, field);
        move |source: ParseError| LoadError::Parse { context, source }
    };
    let config_err = |source: ConfigurationError| LoadError::Configuration {
        context: context.to_string(),
        source,
    };

    let start = match &raw.start {
        Some(s) => parse_time_of_day(s).map_err(parse_err("start"))?,
        None => NaiveTime::MIN,
    };
    let end = match &raw.end {
        Some(s) => parse_time_of_day(s).map_err(parse_err("end"))?,
        None => NaiveTime::MIN,
    };

    let mut window = TimeWindow::new(start, end);
    if let Some(days) = &raw.weekdays {
        let days = parse_range_list(days, 1, 7).map_err(parse_err("weekdays"))?;
        window = window
            .on_weekdays(days.into_iter().map(|d| d as u8))
            .map_err(config_err)?;
    }
    if let Some(months) = &raw.months {
        let months = parse_range_list(months, 1, 12).map_err(parse_err("months"))?;
        window = window.in_months(months).map_err(config_err)?;
    }
    Ok(window)
}

fn room_config(id: &str, room: &RawRoom, raw: &RawConfig) -> Result<RoomConfig, LoadError> {
    if room.actors.is_empty() {
        return Err(LoadError::NoActors(id.to_string()));
    }
    let mut config = RoomConfig::new(id, room.actors.clone())
        .with_reschedule_delay(
            room.reschedule_delay
                .or(raw.reschedule_delay)
                .unwrap_or(Duration::ZERO),
        )
        .with_replicate_changes(
            room.replicate_changes
                .or(raw.replicate_changes)
                .unwrap_or(true),
        );
    if let Some(name) = &room.friendly_name {
        config = config.with_friendly_name(name.clone());
    }
    Ok(config)
}

fn load_actor_type(raw: &RawActorType) -> Result<ActorType, LoadError> {
    let (kind, min, max) = match raw {
        RawActorType::Name(kind) => (kind.as_str(), None, None),
        RawActorType::Table { kind, min, max } => (kind.as_str(), *min, *max),
    };
    match kind {
        "numeric" => {
            if let (Some(lo), Some(hi)) = (min, max) {
                if lo > hi {
                    return Err(LoadError::InvalidActorType(format!(
                        "numeric min {} is above max {}",
                        lo, hi
                    )));
                }
            }
            Ok(ActorType::Numeric { min, max })
        }
        "generic" | "switch" if min.is_some() || max.is_some() => Err(LoadError::InvalidActorType(
            format!("{} takes no min/max", kind),
        )),
        "generic" => Ok(ActorType::Generic),
        "switch" => Ok(ActorType::Switch),
        other => Err(LoadError::InvalidActorType(format!("unknown type {:?}", other))),
    }
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
