// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error taxonomy for resolution and reconciliation
//!
//! None of these errors is fatal. Resolution skips the offending rule or
//! path, reconciliation leaves the room's last converged value in place.

use crate::value::Value;
use thiserror::Error;

/// A value was rejected by the configured actor type
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value {value} for actor type {actor_type}: {reason}")]
pub struct ValidationError {
    pub value: Value,
    pub actor_type: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(value: Value, actor_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value,
            actor_type: actor_type.into(),
            reason: reason.into(),
        }
    }
}

/// The expression evaluator failed
#[derive(Debug, Clone, PartialEq, Error)]
#[error("error while evaluating {expression:?}: {message}")]
pub struct EvaluationError {
    pub expression: String,
    pub message: String,
}

impl EvaluationError {
    pub fn new(expression: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
            message: message.into(),
        }
    }
}

/// Two results could not be combined
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CompositionError {
    #[error("can't add {left} and {right}")]
    NotAddible { left: String, right: String },
    #[error("can't sum {left} and {right}")]
    NotSummable { left: Value, right: Value },
    #[error("integer overflow adding {left} and {right}")]
    Overflow { left: i64, right: i64 },
}

/// Malformed schedule or result construction, rejected up front
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("levels to break must be >= 1, but is {0}")]
    InvalidBreakLevels(u32),
    #[error("invalid time window: {0}")]
    InvalidWindow(String),
    #[error("invalid rule {rule}: {reason}")]
    InvalidRule { rule: String, reason: String },
}
