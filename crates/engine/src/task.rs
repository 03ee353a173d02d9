// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! One tokio task per room
//!
//! Every trigger a room reacts to, including its own timers, is handled
//! inside the room's task, so transitions of one room never interleave.

use crate::{RoomRuntime, RuntimeError};
use chrono::NaiveDateTime;
use rk_adapters::ValueMirror;
use rk_core::{Clock, ManualRequest, ResolveOutcome, RoomEvent, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

/// Capacity of a room's inbound channel
const INBOX_CAPACITY: usize = 64;

enum RoomCommand {
    Event(RoomEvent),
    ResolveNow {
        at: Option<NaiveDateTime>,
        reply: oneshot::Sender<ResolveOutcome>,
    },
    Shutdown,
}

/// Sends requests to a running room
#[derive(Clone)]
pub struct RoomHandle {
    id: Arc<str>,
    tx: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn send(&self, command: RoomCommand) -> Result<(), RuntimeError> {
        self.tx
            .send(command)
            .await
            .map_err(|_| RuntimeError::RoomStopped(self.id.to_string()))
    }

    /// Override the schedule with a value or expression
    pub async fn request_manual_value(
        &self,
        request: ManualRequest,
        force_resend: bool,
        reschedule_delay: Option<Duration>,
    ) -> Result<(), RuntimeError> {
        self.send(RoomCommand::Event(RoomEvent::ManualValue {
            request,
            force_resend,
            reschedule_delay,
        }))
        .await
    }

    /// Report a value an actuator was set to from outside
    pub async fn notify_external_change(
        &self,
        actuator: impl Into<String>,
        value: Value,
    ) -> Result<(), RuntimeError> {
        self.send(RoomCommand::Event(RoomEvent::ValueChanged {
            actuator: actuator.into(),
            value,
        }))
        .await
    }

    /// Re-apply the schedule after `delay`
    pub async fn reschedule(&self, delay: Duration, restart: bool) -> Result<(), RuntimeError> {
        self.send(RoomCommand::Event(RoomEvent::Reschedule { delay, restart }))
            .await
    }

    /// Resolve the schedule without touching the room
    pub async fn resolve_now(
        &self,
        at: Option<NaiveDateTime>,
    ) -> Result<ResolveOutcome, RuntimeError> {
        let (reply, rx) = oneshot::channel();
        self.send(RoomCommand::ResolveNow { at, reply }).await?;
        rx.await
            .map_err(|_| RuntimeError::RoomStopped(self.id.to_string()))
    }

    /// Stop the room task; pending timers are dropped
    pub async fn shutdown(&self) {
        // Already stopped is fine
        let _ = self.tx.send(RoomCommand::Shutdown).await;
    }
}

/// Start `runtime` on its own task
pub fn spawn_room<M, C>(mut runtime: RoomRuntime<M, C>) -> (RoomHandle, JoinHandle<()>)
where
    M: ValueMirror,
    C: Clock + 'static,
{
    let (tx, mut rx) = mpsc::channel(INBOX_CAPACITY);
    let handle = RoomHandle {
        id: Arc::from(runtime.id()),
        tx,
    };

    let task = tokio::spawn(async move {
        runtime.startup().await;

        loop {
            let deadline = runtime.next_deadline();
            let timer = async {
                match deadline {
                    Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
                    None => std::future::pending().await,
                }
            };

            tokio::select! {
                command = rx.recv() => match command {
                    Some(RoomCommand::Event(event)) => runtime.handle(event).await,
                    Some(RoomCommand::ResolveNow { at, reply }) => {
                        // The requester may have given up waiting
                        let _ = reply.send(runtime.resolve_now(at));
                    }
                    Some(RoomCommand::Shutdown) | None => break,
                },
                () = timer => runtime.poll_timers().await,
            }
        }

        tracing::info!(room = runtime.id(), "room stopped");
    });

    (handle, task)
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
