// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Effect executor

use rk_adapters::{Actuator, MirrorError, ValueMirror};
use rk_core::{Clock, Effect, Event, Scheduler, Value};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::Instrument;

/// Errors that can occur during effect execution
#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),
}

/// Executes one room's effects against its adapters
pub struct Executor<M, C> {
    actuators: Vec<Arc<dyn Actuator>>,
    mirror: M,
    scheduler: Arc<Mutex<Scheduler>>,
    events: Option<mpsc::UnboundedSender<Event>>,
    clock: C,
}

impl<M, C> Executor<M, C>
where
    M: ValueMirror,
    C: Clock,
{
    pub fn new(
        actuators: Vec<Arc<dyn Actuator>>,
        mirror: M,
        scheduler: Arc<Mutex<Scheduler>>,
        clock: C,
    ) -> Self {
        Self {
            actuators,
            mirror,
            scheduler,
            events: None,
            clock,
        }
    }

    /// Forward emitted events to `events`
    pub fn with_subscriber(mut self, events: mpsc::UnboundedSender<Event>) -> Self {
        self.events = Some(events);
        self
    }

    /// Execute a single effect with tracing
    ///
    /// Returns whether any actuator actually received a value.
    pub async fn execute(&self, effect: Effect) -> Result<bool, ExecuteError> {
        use rk_core::TracedEffect;

        let span = tracing::info_span!("effect", effect = effect.name());
        async move {
            tracing::debug!(fields = ?effect.fields(), "executing");

            let start = std::time::Instant::now();
            let result = self.execute_inner(effect).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(changed) => tracing::debug!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    changed,
                    "completed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }

    async fn execute_inner(&self, effect: Effect) -> Result<bool, ExecuteError> {
        match effect {
            Effect::Emit(event) => {
                tracing::info!(event = event.name(), room = event.room(), ?event, "event");
                if let Some(events) = &self.events {
                    // A dropped subscriber only stops forwarding
                    let _ = events.send(event);
                }
                Ok(false)
            }

            Effect::SetValue {
                room,
                value,
                force_resend,
                origin,
            } => {
                tracing::info!(%room, %value, %origin, force_resend, "setting value");
                Ok(self.set_value(&room, &value, force_resend).await)
            }

            Effect::MirrorScheduledValue { room, value } => {
                self.mirror.store(&room, &value).await?;
                Ok(false)
            }

            Effect::SetTimer { id, duration } => {
                let now = self.clock.now();
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .set_timer(id, duration, now);
                Ok(false)
            }

            Effect::CancelTimer { id } => {
                self.scheduler
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .cancel_timer(&id);
                Ok(false)
            }
        }
    }

    /// Push to every actuator; failures are logged and do not stop the others
    async fn set_value(&self, room: &str, value: &Value, force_resend: bool) -> bool {
        let mut changed = false;
        for actuator in &self.actuators {
            match actuator.set_value(value, force_resend).await {
                Ok(sent) => changed |= sent,
                Err(e) => tracing::warn!(room, actuator = actuator.id(), error = %e, "actuator failed"),
            }
        }
        changed
    }

    /// Execute effects in order, logging failures and carrying on
    pub async fn execute_all(&self, effects: Vec<Effect>) -> bool {
        let mut changed = false;
        for effect in effects {
            match self.execute(effect).await {
                Ok(sent) => changed |= sent,
                Err(e) => tracing::warn!(error = %e, "effect failed, continuing"),
            }
        }
        changed
    }

    pub fn mirror(&self) -> &M {
        &self.mirror
    }

    /// Get a reference to the scheduler
    pub fn scheduler(&self) -> Arc<Mutex<Scheduler>> {
        Arc::clone(&self.scheduler)
    }
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
