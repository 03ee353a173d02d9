// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! rk-core: Core library for the roomkeeper (rk) scheduler
//!
//! This crate provides:
//! - The value type and the result algebra expressions produce
//! - The rule tree model and time-window predicates
//! - Path traversal resolving the value a schedule prescribes
//! - The pure room state machine reconciling values with actuators
//! - One-shot timers keyed by id

pub mod actor_type;
pub mod clock;
pub mod error;
pub mod predicate;
pub mod value;

// Resolution (order matters for dependencies)
pub mod result;
pub mod schedule;
pub mod resolve;

// State machine
pub mod effect;
pub mod room;
pub mod scheduler;
pub mod traced;

// Re-exports
pub use actor_type::{ActorType, ValueValidator};
pub use clock::{Clock, FakeClock, SystemClock};
pub use effect::{Effect, Event, ValueOrigin};
pub use error::{CompositionError, ConfigurationError, EvaluationError, ValidationError};
pub use predicate::{Always, FnPredicate, Predicate, TimeWindow};
pub use resolve::{resolve, Evaluator, Resolution, ResolveOutcome};
pub use result::ResultValue;
pub use room::{ManualRequest, Room, RoomConfig, RoomContext, RoomEvent, RoomState};
pub use scheduler::Scheduler;
pub use schedule::{ExprId, Expression, Rule, RuleKind, RulePath, Schedule};
pub use traced::TracedEffect;
pub use value::Value;
