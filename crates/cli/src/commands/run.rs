// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `rk run`
//!
//! Starts every room with logging actuators and a JSON file mirror. Control
//! messages are read from stdin, one JSON object per line:
//!
//! ```text
//! {"set_value": {"room_name": "office", "v": 18, "reschedule_delay": 30}}
//! {"reschedule": {"room_name": "office"}}
//! {"value_changed": {"room_name": "office", "actuator": "trv-1", "value": 19}}
//! ```

use anyhow::Result;
use rk_adapters::{
    Actuator, FileMirror, LogActuator, NoOpMirror, TracedActuator, TracedMirror, ValueMirror,
};
use rk_config::Config;
use rk_core::{SystemClock, Value};
use rk_engine::{start_rooms, ControlError, Controller, RescheduleRequest, SetValueRequest};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[derive(clap::Args)]
pub struct RunArgs {
    /// Configuration file
    config: PathBuf,

    /// File the last scheduled value of every room is kept in
    #[arg(long, default_value = "rk-state.json", conflicts_with = "no_state")]
    state: PathBuf,

    /// Keep no state; every start sends the scheduled values again
    #[arg(long)]
    no_state: bool,

    /// Stop once stdin is exhausted instead of waiting for Ctrl-C
    #[arg(long)]
    once: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum ControlMessage {
    SetValue(SetValueRequest),
    Reschedule(RescheduleRequest),
    ValueChanged {
        room_name: String,
        actuator: String,
        value: Value,
    },
}

async fn dispatch(controller: &Controller, line: &str) -> Result<(), ControlError> {
    match serde_json::from_str(line)? {
        ControlMessage::SetValue(request) => controller.set_value(request).await,
        ControlMessage::Reschedule(request) => controller.reschedule(request).await.map(|_| ()),
        ControlMessage::ValueChanged {
            room_name,
            actuator,
            value,
        } => {
            let room = controller
                .room(&room_name)
                .ok_or(ControlError::UnknownRoom(room_name))?;
            Ok(room.notify_external_change(actuator, value).await?)
        }
    }
}

pub async fn handle(args: RunArgs) -> Result<()> {
    let config = super::load(&args.config)?;

    if args.no_state {
        serve(&config, NoOpMirror::new(), args.once).await
    } else {
        tracing::info!(state = %args.state.display(), "keeping scheduled values");
        serve(&config, FileMirror::new(&args.state), args.once).await
    }
}

async fn serve<M: ValueMirror>(config: &Config, mirror: M, once: bool) -> Result<()> {
    let (stop_tx, mut stop_rx) = mpsc::unbounded_channel();
    ctrlc::set_handler(move || {
        eprintln!("\nShutting down...");
        // Receiver gone means we are already stopping
        let _ = stop_tx.send(());
    })?;

    let started = start_rooms(config, TracedMirror::new(mirror), SystemClock, None, |id| {
        Arc::new(TracedActuator::new(LogActuator::new(id))) as Arc<dyn Actuator>
    });
    tracing::info!(rooms = started.tasks.len(), "rk running");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut reading = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if reading => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => {
                    if let Err(e) = dispatch(&started.controller, &line).await {
                        tracing::warn!(error = %e, "control message rejected");
                    }
                }
                Ok(None) => {
                    if once {
                        break;
                    }
                    reading = false;
                }
                Err(e) => {
                    tracing::warn!(error = %e, "stopped reading control messages");
                    reading = false;
                }
            },
            _ = stop_rx.recv() => break,
        }
    }

    started.controller.shutdown().await;
    for task in started.tasks {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "room task failed");
        }
    }
    tracing::info!("rk stopped");
    Ok(())
}
