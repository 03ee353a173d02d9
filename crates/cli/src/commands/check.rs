// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rk check`

use anyhow::Result;
use std::path::PathBuf;

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Configuration file
    config: PathBuf,
}

pub fn handle(args: CheckArgs) -> Result<()> {
    let config = super::load(&args.config)?;

    println!("{:<16} {:<24} {:>6} {:>6}", "ROOM", "NAME", "ACTORS", "RULES");
    for def in &config.rooms {
        println!(
            "{:<16} {:<24} {:>6} {:>6}",
            def.config.id,
            def.config.display_name(),
            def.config.actuators.len(),
            def.schedule.rules().len()
        );
    }
    println!();
    println!(
        "{}: {} room(s) ok",
        args.config.display(),
        config.rooms.len()
    );
    Ok(())
}
