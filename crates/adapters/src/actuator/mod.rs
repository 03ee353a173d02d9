// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actuator adapters
//!
//! An actuator is one physical device a room drives. Retrying failed pushes
//! is the actuator's own business; callers log the error and move on.

mod logging;

pub use logging::LogActuator;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ActuatorCall, FakeActuator};

use async_trait::async_trait;
use rk_core::Value;
use thiserror::Error;

/// Errors from actuator operations
#[derive(Debug, Error)]
pub enum ActuatorError {
    #[error("actuator {actuator} rejected {value}: {reason}")]
    Rejected {
        actuator: String,
        value: Value,
        reason: String,
    },
    #[error("actuator {0} is unavailable")]
    Unavailable(String),
}

/// Adapter for a single actuator device
#[async_trait]
pub trait Actuator: Send + Sync + 'static {
    /// Identifier of the device
    fn id(&self) -> &str;

    /// Push a value; returns whether anything was actually sent.
    ///
    /// Unless `force_resend` is set, a value equal to the one the device
    /// already has is not sent again.
    async fn set_value(&self, value: &Value, force_resend: bool) -> Result<bool, ActuatorError>;
}
