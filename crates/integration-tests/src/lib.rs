//! Integration tests for QuickCart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p quickcart-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart snapshots on the file backend, across store instances
//! - `wishlist_persistence` - Wishlist write-through and reload
//!
//! Every test works in its own directory under the system temp dir, created by
//! [`TestContext::new`] and removed when the context is dropped.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::{Path, PathBuf};
use std::sync::Arc;

use quickcart_storefront::Storefront;
use quickcart_storefront::config::{StorageBackend, StorageConfig, StorefrontConfig};
use quickcart_storefront::notify::RecordingNotifier;
use quickcart_storefront::storage::{FileSlotStore, SlotStore};

/// A scratch data directory plus helpers to open stores on it.
pub struct TestContext {
    dir: PathBuf,
    pub notifier: Arc<RecordingNotifier>,
}

impl TestContext {
    /// Create a context with a fresh, not-yet-existing data directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = std::env::temp_dir().join(format!("quickcart-it-{}", uuid::Uuid::new_v4()));
        Self {
            dir,
            notifier: Arc::new(RecordingNotifier::new()),
        }
    }

    /// The data directory used by the file backend.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Configuration pointing the file backend at this context's directory.
    #[must_use]
    pub fn config(&self) -> StorefrontConfig {
        StorefrontConfig {
            storage: StorageConfig {
                backend: StorageBackend::File {
                    dir: self.dir.clone(),
                },
                ..StorageConfig::default()
            },
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
        }
    }

    /// A raw slot store over the same directory, for inspecting slots.
    #[must_use]
    pub fn slots(&self) -> Arc<dyn SlotStore> {
        Arc::new(FileSlotStore::new(self.dir.clone()))
    }

    /// Open a storefront on this context's directory, like a fresh process would.
    pub async fn open(&self) -> Storefront {
        Storefront::open(self.config(), self.notifier.clone()).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}
