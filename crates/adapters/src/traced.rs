// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrappers for consistent observability

use crate::actuator::{Actuator, ActuatorError};
use crate::mirror::{MirrorError, ValueMirror};
use async_trait::async_trait;
use rk_core::Value;
use tracing::Instrument;

/// Wrapper that adds tracing to any Actuator
#[derive(Clone)]
pub struct TracedActuator<A> {
    inner: A,
}

impl<A> TracedActuator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: Actuator> Actuator for TracedActuator<A> {
    fn id(&self) -> &str {
        self.inner.id()
    }

    async fn set_value(&self, value: &Value, force_resend: bool) -> Result<bool, ActuatorError> {
        let span = tracing::info_span!("actuator.set_value", actuator = self.inner.id());
        async move {
            tracing::debug!(%value, force_resend, "pushing");

            let start = std::time::Instant::now();
            let result = self.inner.set_value(value, force_resend).await;
            let elapsed = start.elapsed();

            match &result {
                Ok(changed) => tracing::info!(
                    changed,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "value pushed"
                ),
                Err(e) => tracing::error!(
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "push failed"
                ),
            }

            result
        }
        .instrument(span)
        .await
    }
}

/// Wrapper that adds tracing to any ValueMirror
#[derive(Clone)]
pub struct TracedMirror<M> {
    inner: M,
}

impl<M> TracedMirror<M> {
    pub fn new(inner: M) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<M: ValueMirror> ValueMirror for TracedMirror<M> {
    async fn load(&self, room: &str) -> Result<Option<Value>, MirrorError> {
        let result = self
            .inner
            .load(room)
            .instrument(tracing::info_span!("mirror.load", room))
            .await;
        match &result {
            Ok(Some(value)) => tracing::debug!(room, %value, "restored"),
            Ok(None) => tracing::debug!(room, "nothing stored"),
            Err(e) => tracing::warn!(room, error = %e, "load failed"),
        }
        result
    }

    async fn store(&self, room: &str, value: &Value) -> Result<(), MirrorError> {
        let result = self
            .inner
            .store(room, value)
            .instrument(tracing::info_span!("mirror.store", room, %value))
            .await;
        if let Err(e) = &result {
            tracing::warn!(room, error = %e, "store failed");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
