// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! External mirror of each room's last scheduled value
//!
//! Writes are opportunistic: a failed store is logged and the room keeps
//! running. On startup the engine restores from the mirror so a restart does
//! not re-push an unchanged value.

mod file;
mod noop;

pub use file::FileMirror;
pub use noop::NoOpMirror;

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeMirror, MirrorCall};

use async_trait::async_trait;
use rk_core::Value;
use thiserror::Error;

/// Errors from mirror operations
#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("mirror io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("mirror file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Adapter persisting the last scheduled value per room
#[async_trait]
pub trait ValueMirror: Clone + Send + Sync + 'static {
    /// Last value stored for `room`, if any
    async fn load(&self, room: &str) -> Result<Option<Value>, MirrorError>;

    /// Record `value` as the last scheduled value of `room`
    async fn store(&self, room: &str, value: &Value) -> Result<(), MirrorError>;
}
