//! Durable slot storage.
//!
//! A slot is a named, persistent location holding one UTF-8 JSON document.
//! The cart and the wishlist each own one slot and always replace it whole,
//! so backends only need get/set/remove on strings.
//!
//! # Backends
//!
//! - [`MemorySlotStore`] - process-local map, used by tests
//! - [`FileSlotStore`] - one `<key>.json` file per slot in a data directory
//!
//! Stores take an `Arc<dyn SlotStore>` so any backend can be injected.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{StorageBackend, StorageConfig};

mod file;
mod memory;

pub use file::FileSlotStore;
pub use memory::MemorySlotStore;

/// Errors raised while reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write the slot.
    #[error("i/o error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The slot holds data that is not a valid snapshot.
    #[error("corrupt data in slot {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The snapshot could not be encoded.
    #[error("failed to encode slot {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// The key cannot name a slot on this backend.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),

    /// Any other backend failure.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A key-value store of durable slots.
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read a slot. Returns `None` if the slot does not exist.
    async fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace a slot's contents, creating it if needed.
    ///
    /// Readers must see either the old value or the new one, never a mix.
    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting a missing slot succeeds.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Whether the slot currently exists.
    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        Ok(self.read(key).await?.is_some())
    }
}

/// Read and decode a JSON slot.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` if the slot is not valid JSON for `T`,
/// or the backend's error if the read fails.
pub async fn load_json<T: DeserializeOwned>(
    slots: &dyn SlotStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = slots.read(key).await? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

/// Encode a value as JSON and write it to a slot.
///
/// # Errors
///
/// Returns `StorageError::Encode` if serialization fails, or the backend's
/// error if the write fails.
pub async fn save_json<T: Serialize + Sync>(
    slots: &dyn SlotStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(|source| StorageError::Encode {
        key: key.to_owned(),
        source,
    })?;
    slots.write(key, &raw).await
}

/// Whether `key` is safe to use as a slot name on every backend.
#[must_use]
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
}

/// Build the backend selected by the configuration.
#[must_use]
pub fn open(config: &StorageConfig) -> Arc<dyn SlotStore> {
    match &config.backend {
        StorageBackend::Memory => Arc::new(MemorySlotStore::new()),
        StorageBackend::File { dir } => Arc::new(FileSlotStore::new(dir.clone())),
    }
}
