// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Actor types and the values they accept

use crate::error::ValidationError;
use crate::value::Value;
use std::fmt;

/// Rejects or normalizes candidate values before they reach actuators
pub trait ValueValidator: Send + Sync {
    fn validate(&self, value: &Value) -> Result<Value, ValidationError>;
}

impl<F> ValueValidator for F
where
    F: Fn(&Value) -> Result<Value, ValidationError> + Send + Sync,
{
    fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        self(value)
    }
}

/// The kind of actuator every room of a deployment drives
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActorType {
    /// Accepts any value unchanged
    #[default]
    Generic,
    /// Binary actuator, values normalize to `"on"` / `"off"`
    Switch,
    /// Numeric setpoints within optional inclusive bounds
    Numeric { min: Option<f64>, max: Option<f64> },
}

impl ActorType {
    pub fn name(&self) -> &'static str {
        match self {
            ActorType::Generic => "generic",
            ActorType::Switch => "switch",
            ActorType::Numeric { .. } => "numeric",
        }
    }

    fn reject(&self, value: &Value, reason: impl Into<String>) -> ValidationError {
        ValidationError::new(value.clone(), self.name(), reason)
    }
}

impl fmt::Display for ActorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ValueValidator for ActorType {
    fn validate(&self, value: &Value) -> Result<Value, ValidationError> {
        match self {
            ActorType::Generic => Ok(value.clone()),
            ActorType::Switch => match value {
                Value::Bool(true) => Ok(Value::from("on")),
                Value::Bool(false) => Ok(Value::from("off")),
                Value::Text(s) if s.eq_ignore_ascii_case("on") => Ok(Value::from("on")),
                Value::Text(s) if s.eq_ignore_ascii_case("off") => Ok(Value::from("off")),
                _ => Err(self.reject(value, "expected \"on\" or \"off\"")),
            },
            ActorType::Numeric { min, max } => {
                let Some(x) = value.as_f64() else {
                    return Err(self.reject(value, "not a number"));
                };
                if min.is_some_and(|min| x < min) {
                    return Err(self.reject(value, format!("below minimum {:?}", min)));
                }
                if max.is_some_and(|max| x > max) {
                    return Err(self.reject(value, format!("above maximum {:?}", max)));
                }
                Ok(value.clone())
            }
        }
    }
}
