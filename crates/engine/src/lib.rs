// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! roomkeeper room engine
//!
//! Runs each room on its own task, executes the effects its state machine
//! requests and routes control requests to the right room.

pub mod boundary;
mod controller;
mod error;
mod executor;
mod runtime;
mod start;
mod task;

pub use boundary::{next_boundary, until_next_boundary};
pub use controller::{Controller, RescheduleRequest, SetValueRequest, RESCHEDULE_REQUEST_DELAY};
pub use error::{ControlError, RuntimeError};
pub use executor::{ExecuteError, Executor};
pub use runtime::{RoomDeps, RoomRuntime};
pub use start::{start_rooms, Started};
pub use task::{spawn_room, RoomHandle};
