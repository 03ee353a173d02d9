// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

pub mod check;
pub mod resolve;
pub mod run;
pub mod times;

use anyhow::{Context, Result};
use rk_config::{Config, RoomDef};
use std::path::Path;

/// Load a configuration file, naming it in the error
pub fn load(path: &Path) -> Result<Config> {
    rk_config::load_config_file(path)
        .with_context(|| format!("failed to load {}", path.display()))
}

/// All rooms, or only the one named
pub fn select_rooms<'a>(config: &'a Config, room: Option<&str>) -> Result<Vec<&'a RoomDef>> {
    match room {
        Some(id) => {
            let def = config
                .room(id)
                .ok_or_else(|| anyhow::anyhow!("unknown room: {}", id))?;
            Ok(vec![def])
        }
        None => Ok(config.rooms.iter().collect()),
    }
}
