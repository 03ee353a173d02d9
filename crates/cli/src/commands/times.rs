// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rk times`

use anyhow::Result;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct TimesArgs {
    /// Configuration file
    config: PathBuf,

    /// Only this room
    #[arg(long)]
    room: Option<String>,
}

pub fn handle(args: TimesArgs) -> Result<()> {
    let config = super::load(&args.config)?;

    for def in super::select_rooms(&config, args.room.as_deref())? {
        let times: Vec<String> = def
            .scheduling_times
            .iter()
            .map(|time| time.format("%H:%M").to_string())
            .collect();
        if times.is_empty() {
            println!("{}: -", def.config.id);
        } else {
            println!("{}: {}", def.config.id, times.join(" "));
        }
    }
    Ok(())
}
