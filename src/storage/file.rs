//! Durable backend — a JSON object file mapping keys to strings.
//!
//! DESIGN
//! ======
//! Every mutation is read-modify-write of the whole file under an async
//! mutex, then a write to a sibling temp file that is synced to disk before
//! it is renamed over the store. The rename is the commit point: a crash
//! leaves either the old or the new store on disk, never a truncated one.
//!
//! ERROR HANDLING
//! ==============
//! A missing file is an empty store, and so is a blank one (with a
//! warning). A file that does not parse as a JSON object of strings is
//! `Corrupt`; writes refuse to overwrite it.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{StorageBackend, StorageError};

/// On-disk key-value store at a fixed path.
#[derive(Debug)]
pub struct FileBackend {
    path: PathBuf,
    io_lock: Mutex<()>,
}

impl FileBackend {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), io_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        // EDGE: our own writes never leave a blank file; something outside did.
        if raw.trim().is_empty() {
            warn!(path = %self.path.display(), "store file is blank; treating as empty");
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    async fn store_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let raw = serde_json::to_string_pretty(entries)?;
        let tmp = self.tmp_path();
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(raw.as_bytes()).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), keys = entries.len(), "store file replaced");
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.load_entries().await?;
        Ok(entries.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.load_entries().await?;
        if entries.get(key).is_some_and(|current| current == value) {
            return Ok(());
        }
        entries.insert(key.to_owned(), value.to_owned());
        self.store_entries(&entries).await
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.io_lock.lock().await;
        let mut entries = self.load_entries().await?;
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.store_entries(&entries).await
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
