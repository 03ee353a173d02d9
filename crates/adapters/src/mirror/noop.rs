// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op mirror

use super::{MirrorError, ValueMirror};
use async_trait::async_trait;
use rk_core::Value;

/// Mirror that remembers nothing
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpMirror;

impl NoOpMirror {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ValueMirror for NoOpMirror {
    async fn load(&self, _room: &str) -> Result<Option<Value>, MirrorError> {
        Ok(None)
    }

    async fn store(&self, _room: &str, _value: &Value) -> Result<(), MirrorError> {
        Ok(())
    }
}
