// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for the engine runtime

use crate::ExecuteError;
use thiserror::Error;

/// Errors that can occur in a room runtime
#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("execute error: {0}")]
    Execute(#[from] ExecuteError),
    #[error("room {0} is not running")]
    RoomStopped(String),
}

/// Rejected control requests
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("unknown room {0}")]
    UnknownRoom(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("expressions in control requests are disabled")]
    ExpressionsDisabled,
    #[error("malformed request: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
