// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake actuator for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{Actuator, ActuatorError};
use async_trait::async_trait;
use rk_core::Value;
use std::sync::{Arc, Mutex};

/// Recorded push
#[derive(Debug, Clone, PartialEq)]
pub struct ActuatorCall {
    pub value: Value,
    pub force_resend: bool,
    /// Whether the push was actually sent
    pub sent: bool,
}

#[derive(Default)]
struct FakeState {
    current: Option<Value>,
    calls: Vec<ActuatorCall>,
    unavailable: bool,
}

/// Fake actuator that records pushes; clones share state
#[derive(Clone)]
pub struct FakeActuator {
    id: String,
    inner: Arc<Mutex<FakeState>>,
}

impl FakeActuator {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            inner: Arc::new(Mutex::new(FakeState::default())),
        }
    }

    /// Get all recorded pushes
    pub fn calls(&self) -> Vec<ActuatorCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    /// Values that were actually sent, in order
    pub fn sent(&self) -> Vec<Value> {
        self.calls()
            .into_iter()
            .filter(|call| call.sent)
            .map(|call| call.value)
            .collect()
    }

    pub fn current(&self) -> Option<Value> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .current
            .clone()
    }

    /// Simulate the device being changed by hand
    pub fn set_current(&self, value: Value) {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).current = Some(value);
    }

    /// Make subsequent pushes fail
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .unavailable = unavailable;
    }
}

#[async_trait]
impl Actuator for FakeActuator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn set_value(&self, value: &Value, force_resend: bool) -> Result<bool, ActuatorError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if state.unavailable {
            return Err(ActuatorError::Unavailable(self.id.clone()));
        }
        let sent = force_resend || state.current.as_ref() != Some(value);
        state.calls.push(ActuatorCall {
            value: value.clone(),
            force_resend,
            sent,
        });
        state.current = Some(value.clone());
        Ok(sent)
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
