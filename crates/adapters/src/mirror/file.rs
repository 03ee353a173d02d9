// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file mirror
//!
//! All rooms share one file holding an object keyed by room id. Stores are
//! serialized through a lock and written to a sibling temp file that is then
//! renamed over the original.

use super::{MirrorError, ValueMirror};
use async_trait::async_trait;
use rk_core::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone, Debug)]
pub struct FileMirror {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl FileMirror {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, Value>, MirrorError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl ValueMirror for FileMirror {
    async fn load(&self, room: &str) -> Result<Option<Value>, MirrorError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all().await?.remove(room))
    }

    async fn store(&self, room: &str, value: &Value) -> Result<(), MirrorError> {
        let _guard = self.lock.lock().await;
        let mut values = self.read_all().await?;
        if values.get(room) == Some(value) {
            return Ok(());
        }
        values.insert(room.to_string(), value.clone());

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, serde_json::to_vec_pretty(&values)?).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        tracing::debug!(room, %value, path = %self.path.display(), "mirrored value");
        Ok(())
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
