//! Storage — async key-value backends behind the slot.
//!
//! DESIGN
//! ======
//! The slot only needs `get`/`set`/`delete` keyed by string. Backends are
//! injected as `Arc<dyn StorageBackend>` so tests can swap in a fake and the
//! binary can choose a durable file or a process-local map at startup.

pub mod file;
pub mod memory;

pub use file::FileBackend;
pub use memory::MemoryBackend;

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by storage backends.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Reading or writing the underlying medium failed.
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored data could not be decoded.
    #[error("storage data corrupt: {0}")]
    Corrupt(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        Self::Corrupt(e.to_string())
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// Minimal async key-value contract. Enables mocking in tests.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Fetch the value stored under `key`, `None` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the value could not be persisted.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be updated.
    async fn delete(&self, key: &str) -> Result<(), StorageError>;
}
