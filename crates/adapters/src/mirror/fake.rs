// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake mirror for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{MirrorError, ValueMirror};
use async_trait::async_trait;
use rk_core::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Recorded mirror call
#[derive(Debug, Clone, PartialEq)]
pub enum MirrorCall {
    Load { room: String },
    Store { room: String, value: Value },
}

#[derive(Default)]
struct FakeMirrorState {
    values: HashMap<String, Value>,
    calls: Vec<MirrorCall>,
}

/// In-memory mirror; clones share state
#[derive(Clone, Default)]
pub struct FakeMirror {
    inner: Arc<Mutex<FakeMirrorState>>,
}

impl FakeMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored value, as if left behind by an earlier run
    pub fn with_value(self, room: impl Into<String>, value: Value) -> Self {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values
            .insert(room.into(), value);
        self
    }

    pub fn calls(&self) -> Vec<MirrorCall> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .calls
            .clone()
    }

    pub fn value(&self, room: &str) -> Option<Value> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .values
            .get(room)
            .cloned()
    }
}

#[async_trait]
impl ValueMirror for FakeMirror {
    async fn load(&self, room: &str) -> Result<Option<Value>, MirrorError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(MirrorCall::Load {
            room: room.to_string(),
        });
        Ok(state.values.get(room).cloned())
    }

    async fn store(&self, room: &str, value: &Value) -> Result<(), MirrorError> {
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        state.calls.push(MirrorCall::Store {
            room: room.to_string(),
            value: value.clone(),
        });
        state.values.insert(room.to_string(), value.clone());
        Ok(())
    }
}
