// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rk resolve`

use crate::output::{print_list, OutputFormat};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use rk_core::{Clock, ResolveOutcome, Room, RoomContext, SystemClock, Value};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(clap::Args)]
pub struct ResolveArgs {
    /// Configuration file
    config: PathBuf,

    /// Only this room
    #[arg(long)]
    room: Option<String>,

    /// Local time to resolve at, e.g. 2026-10-14T07:30 (default: now)
    #[arg(long, value_parser = parse_at)]
    at: Option<NaiveDateTime>,

    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
}

fn parse_at(s: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
        .with_context(|| format!("expected YYYY-MM-DDTHH:MM[:SS], got {:?}", s))
}

#[derive(Serialize)]
struct RoomResolution {
    room: String,
    outcome: &'static str,
    value: Option<Value>,
    rule: Option<String>,
}

impl RoomResolution {
    fn new(room: &str, outcome: ResolveOutcome) -> Self {
        let (outcome, value, rule) = match outcome {
            ResolveOutcome::Resolved(resolution) => (
                "resolved",
                Some(resolution.value),
                Some(resolution.rule.to_string()),
            ),
            ResolveOutcome::Aborted => ("aborted", None, None),
            ResolveOutcome::NoResult => ("empty", None, None),
        };
        Self {
            room: room.to_string(),
            outcome,
            value,
            rule,
        }
    }
}

impl fmt::Display for RoomResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.rule) {
            (Some(value), Some(rule)) => write!(f, "{:<16} {:<10} ({})", self.room, value.to_string(), rule),
            _ => write!(f, "{:<16} <{}>", self.room, self.outcome),
        }
    }
}

pub fn handle(args: ResolveArgs) -> Result<()> {
    let config = super::load(&args.config)?;
    let at = args.at.unwrap_or_else(|| SystemClock.local_now());
    let evaluator = config.evaluator();
    let ctx = RoomContext {
        evaluator: &evaluator,
        validator: &config.actor_type,
    };

    let results: Vec<RoomResolution> = super::select_rooms(&config, args.room.as_deref())?
        .into_iter()
        .map(|def| {
            let room = Room::new(def.config.clone(), Some(Arc::clone(&def.schedule)));
            RoomResolution::new(room.id(), room.resolve_now(&ctx, at))
        })
        .collect();

    print_list(&results, args.format)
}
