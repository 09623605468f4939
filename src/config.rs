//! Store configuration parsed from environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use crate::storage::{FileBackend, MemoryBackend, StorageBackend};

pub const DEFAULT_STORE_PATH: &str = "fruit-store.json";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown FRUIT_STORE_BACKEND: {0} (expected 'file' or 'memory')")]
    UnknownBackend(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// JSON file at the given path.
    File(PathBuf),
    /// Process-local map; nothing survives exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub backend: BackendKind,
}

impl StoreConfig {
    /// Build config from environment variables.
    ///
    /// Optional:
    /// - `FRUIT_STORE_BACKEND`: `file` (default) or `memory`
    /// - `FRUIT_STORE_PATH`: store file path, default `fruit-store.json`
    ///
    /// # Errors
    ///
    /// Returns an error if `FRUIT_STORE_BACKEND` names an unknown backend.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns an error if `FRUIT_STORE_BACKEND` names an unknown backend.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = lookup("FRUIT_STORE_PATH")
            .filter(|p| !p.trim().is_empty())
            .map_or_else(|| PathBuf::from(DEFAULT_STORE_PATH), PathBuf::from);
        let backend = parse_backend(lookup("FRUIT_STORE_BACKEND").as_deref(), path)?;
        Ok(Self { backend })
    }

    /// Construct the configured backend.
    #[must_use]
    pub fn build_backend(&self) -> Arc<dyn StorageBackend> {
        match &self.backend {
            BackendKind::File(path) => Arc::new(FileBackend::new(path.clone())),
            BackendKind::Memory => Arc::new(MemoryBackend::new()),
        }
    }
}

fn parse_backend(raw: Option<&str>, path: PathBuf) -> Result<BackendKind, ConfigError> {
    match raw.map(str::trim).unwrap_or("file") {
        "file" | "" => Ok(BackendKind::File(path)),
        "memory" => Ok(BackendKind::Memory),
        other => Err(ConfigError::UnknownBackend(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
