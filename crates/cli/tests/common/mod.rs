// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test utilities for CLI integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Two rooms: the office heats during the day, the hall is constant.
pub const CONFIG: &str = r#"
actor_type = { type = "numeric", min = 5, max = 30 }
expressions_from_events = true

[schedule_snippets]
party = [{ v = 23 }]

[rooms.office]
friendly_name = "Office"
actors = ["trv-office"]
schedule = [
    { name = "day", start = "06:00", end = "22:00", v = 21 },
    { name = "night", v = 16 },
]

[rooms.hall]
actors = ["trv-hall-1", "trv-hall-2"]
schedule = [{ v = 17 }]
"#;

/// Temporary directory holding `rk.toml` with `content`
pub fn setup_config(content: &str) -> (TempDir, PathBuf) {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let path = temp.path().join("rk.toml");
    fs::write(&path, content).expect("Failed to write config");
    (temp, path)
}
