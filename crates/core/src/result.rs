// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Result algebra of expression evaluation

use crate::error::{CompositionError, ConfigurationError};
use crate::schedule::Schedule;
use crate::value::Value;
use std::fmt;
use std::num::NonZeroU32;
use std::sync::Arc;

/// The closed set of outcomes an expression can produce
#[derive(Debug, Clone)]
pub enum ResultValue {
    /// Terminal value, resolution stops once folding produces it
    Final(Value),
    /// Partial value, added to whatever addible result comes next
    Accumulate(Value),
    /// Stop the whole resolution run, leaving the room untouched
    Abort,
    /// Discard unvisited sibling paths within this many ancestor levels
    BreakLevels(NonZeroU32),
    /// This rule contributes nothing
    Skip,
    /// Splice the matching rules of another schedule in at the current position
    IncludeSchedule(Arc<Schedule>),
}

impl ResultValue {
    /// Construct a validated `BreakLevels`
    pub fn break_levels(levels: u32) -> Result<Self, ConfigurationError> {
        NonZeroU32::new(levels)
            .map(ResultValue::BreakLevels)
            .ok_or(ConfigurationError::InvalidBreakLevels(levels))
    }

    pub fn is_addible(&self) -> bool {
        matches!(self, ResultValue::Final(_) | ResultValue::Accumulate(_))
    }

    /// The payload of an addible result
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ResultValue::Final(v) | ResultValue::Accumulate(v) => Some(v),
            _ => None,
        }
    }

    /// Short variant name for logs and errors
    pub fn kind(&self) -> &'static str {
        match self {
            ResultValue::Final(_) => "Final",
            ResultValue::Accumulate(_) => "Accumulate",
            ResultValue::Abort => "Abort",
            ResultValue::BreakLevels(_) => "BreakLevels",
            ResultValue::Skip => "Skip",
            ResultValue::IncludeSchedule(_) => "IncludeSchedule",
        }
    }

    /// `Accumulate ⊕ addible`: the right operand's variant carrying the summed payload
    pub fn combine(&self, right: &ResultValue) -> Result<ResultValue, CompositionError> {
        let (left_value, right_value) = match (self, right) {
            (ResultValue::Accumulate(l), ResultValue::Final(r) | ResultValue::Accumulate(r)) => {
                (l, r)
            }
            _ => {
                return Err(CompositionError::NotAddible {
                    left: self.kind().to_string(),
                    right: right.kind().to_string(),
                })
            }
        };
        let sum = left_value.checked_add(right_value)?;
        Ok(match right {
            ResultValue::Final(_) => ResultValue::Final(sum),
            _ => ResultValue::Accumulate(sum),
        })
    }

    /// Same variant with the payload replaced
    pub fn with_payload(&self, value: Value) -> ResultValue {
        match self {
            ResultValue::Accumulate(_) => ResultValue::Accumulate(value),
            _ => ResultValue::Final(value),
        }
    }
}

impl PartialEq for ResultValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ResultValue::Final(a), ResultValue::Final(b)) => a == b,
            (ResultValue::Accumulate(a), ResultValue::Accumulate(b)) => a == b,
            (ResultValue::Abort, ResultValue::Abort) => true,
            (ResultValue::Skip, ResultValue::Skip) => true,
            (ResultValue::BreakLevels(a), ResultValue::BreakLevels(b)) => a == b,
            (ResultValue::IncludeSchedule(a), ResultValue::IncludeSchedule(b)) => {
                Arc::ptr_eq(a, b)
            }
            _ => false,
        }
    }
}

impl fmt::Display for ResultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultValue::Final(v) => write!(f, "Result({})", v),
            ResultValue::Accumulate(v) => write!(f, "Add({})", v),
            ResultValue::Abort => write!(f, "Abort()"),
            ResultValue::BreakLevels(n) => write!(f, "Break({})", n),
            ResultValue::Skip => write!(f, "Skip()"),
            ResultValue::IncludeSchedule(s) => write!(f, "IncludeSchedule({})", s.name()),
        }
    }
}
