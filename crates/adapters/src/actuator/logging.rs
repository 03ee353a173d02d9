// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actuator that only logs what it would send.
//!
//! Used by `rk run` when no device integration is configured.

use super::{Actuator, ActuatorError};
use async_trait::async_trait;
use rk_core::Value;
use std::sync::Mutex;

#[derive(Debug)]
pub struct LogActuator {
    id: String,
    current: Mutex<Option<Value>>,
}

impl LogActuator {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            current: Mutex::new(None),
        }
    }

    pub fn current(&self) -> Option<Value> {
        self.current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl Actuator for LogActuator {
    fn id(&self) -> &str {
        &self.id
    }

    async fn set_value(&self, value: &Value, force_resend: bool) -> Result<bool, ActuatorError> {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if !force_resend && current.as_ref() == Some(value) {
            return Ok(false);
        }
        tracing::info!(actuator = %self.id, %value, force_resend, "sending value");
        *current = Some(value.clone());
        Ok(true)
    }
}
