//! Persistent slot — one optional string under one fixed key.
//!
//! DESIGN
//! ======
//! The slot is the only caller of the storage backend. It pins the key so
//! callers cannot address anything else, and turns backend errors into a
//! `SlotError` that names the operation that failed.

use std::sync::Arc;

use tracing::info;

use crate::storage::{StorageBackend, StorageError};

/// Key the slot lives under.
pub const SLOT_KEY: &str = "fruit";

/// Slot operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotOp {
    Read,
    Write,
    Clear,
}

impl std::fmt::Display for SlotOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Clear => "clear",
        })
    }
}

/// A backend failure seen through the slot.
#[derive(Debug, thiserror::Error)]
#[error("slot {op} failed: {source}")]
pub struct SlotError {
    pub op: SlotOp,
    #[source]
    pub source: StorageError,
}

/// Durable single-value slot over an injected backend.
#[derive(Clone)]
pub struct PersistentSlot {
    backend: Arc<dyn StorageBackend>,
    key: &'static str,
}

impl PersistentSlot {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend, key: SLOT_KEY }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Current value, `None` when never written or cleared.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the backend read fails.
    pub async fn read(&self) -> Result<Option<String>, SlotError> {
        self.backend
            .get(self.key)
            .await
            .map_err(|source| SlotError { op: SlotOp::Read, source })
    }

    /// Replace the stored value with `value`, exactly as given.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the backend write fails.
    pub async fn write(&self, value: &str) -> Result<(), SlotError> {
        self.backend
            .set(self.key, value)
            .await
            .map_err(|source| SlotError { op: SlotOp::Write, source })?;
        info!(key = self.key, len = value.len(), "slot written");
        Ok(())
    }

    /// Remove the stored value. Clearing an empty slot succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`SlotError`] if the backend delete fails.
    pub async fn clear(&self) -> Result<(), SlotError> {
        self.backend
            .delete(self.key)
            .await
            .map_err(|source| SlotError { op: SlotOp::Clear, source })?;
        info!(key = self.key, "slot cleared");
        Ok(())
    }
}

#[cfg(test)]
#[path = "slot_test.rs"]
mod tests;
