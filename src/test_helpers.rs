//! Shared fakes for slot and binding tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::sync::Notify;

use crate::storage::{StorageBackend, StorageError};

/// In-memory backend that counts calls, fails on demand, and can hold
/// `set`/`delete` until released.
#[derive(Default)]
pub struct MockBackend {
    entries: Mutex<HashMap<String, String>>,
    pub gets: AtomicUsize,
    pub sets: AtomicUsize,
    pub deletes: AtomicUsize,
    pub fail_get: AtomicBool,
    pub fail_set: AtomicBool,
    pub fail_delete: AtomicBool,
    gated: AtomicBool,
    gated_reads: AtomicBool,
    /// Signalled once a gated call has started.
    pub entered: Notify,
    /// Releases one gated call.
    pub release: Notify,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let backend = Self::new();
        backend
            .entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        backend
    }

    /// Make subsequent `set`/`delete` calls wait for `release`.
    pub fn gate(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    /// Make subsequent `get` calls wait for `release` as well.
    pub fn gate_reads(&self) {
        self.gated_reads.store(true, Ordering::SeqCst);
    }

    /// Let every later call run straight through.
    pub fn ungate(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gated_reads.store(false, Ordering::SeqCst);
    }

    pub fn stored(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }

    async fn wait_if_gated(&self, gate: &AtomicBool) {
        if gate.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
    }
}

fn unavailable() -> StorageError {
    StorageError::Io(std::io::Error::other("mock backend offline"))
}

#[async_trait::async_trait]
impl StorageBackend for MockBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.wait_if_gated(&self.gated_reads).await;
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.wait_if_gated(&self.gated).await;
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.wait_if_gated(&self.gated).await;
        if self.fail_delete.load(Ordering::SeqCst) {
            return Err(unavailable());
        }
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }
}
