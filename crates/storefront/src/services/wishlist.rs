//! Wishlist store.
//!
//! The wishlist is held in memory for the lifetime of the store and written
//! through to its slot on every change. A change only becomes visible in
//! memory once the write has succeeded, so memory and slot never disagree.

use std::sync::Arc;

use quickcart_core::{ProductId, Toggled, Wishlist};
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{Result, StoreError, add_breadcrumb};
use crate::notify::Notifier;
use crate::storage::{SlotStore, load_json, save_json};

/// Durable set of favorited products.
pub struct WishlistStore {
    slots: Arc<dyn SlotStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
    items: Mutex<Wishlist>,
}

impl WishlistStore {
    /// Open the wishlist stored in slot `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be read or decoded.
    /// The failure is also reported to `notifier`.
    pub async fn open(
        slots: Arc<dyn SlotStore>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Result<Self> {
        let key = key.into();
        match load_json::<Wishlist>(slots.as_ref(), &key).await {
            Ok(items) => {
                let items = items.unwrap_or_default();
                tracing::debug!(slot = %key, items = items.len(), "Wishlist loaded");
                Ok(Self::with_items(slots, notifier, key, items))
            }
            Err(e) => {
                let e = StoreError::from(e);
                tracing::error!(error = %e, slot = %key, "Failed to load wishlist from storage");
                notifier.error("Failed to load wishlist");
                Err(e)
            }
        }
    }

    /// Open the wishlist, starting empty if the slot cannot be loaded.
    ///
    /// The load failure is still logged and reported to `notifier`. The slot
    /// is left untouched until the first change overwrites it.
    pub async fn open_or_empty(
        slots: Arc<dyn SlotStore>,
        notifier: Arc<dyn Notifier>,
        key: impl Into<String>,
    ) -> Self {
        let key = key.into();
        match Self::open(Arc::clone(&slots), Arc::clone(&notifier), key.clone()).await {
            Ok(store) => store,
            Err(_) => Self::with_items(slots, notifier, key, Wishlist::new()),
        }
    }

    fn with_items(
        slots: Arc<dyn SlotStore>,
        notifier: Arc<dyn Notifier>,
        key: String,
        items: Wishlist,
    ) -> Self {
        Self {
            slots,
            notifier,
            key,
            items: Mutex::new(items),
        }
    }

    /// Key of the slot holding this wishlist.
    #[must_use]
    pub fn slot_key(&self) -> &str {
        &self.key
    }

    /// A copy of the current wishlist.
    pub async fn get_all(&self) -> Wishlist {
        self.items.lock().await.clone()
    }

    /// Whether a product is wishlisted.
    pub async fn contains(&self, product_id: &ProductId) -> bool {
        self.items.lock().await.contains(product_id)
    }

    /// Add a product. Adding a wishlisted product changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be written; the
    /// wishlist is then left as it was.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn add(&self, product_id: ProductId) -> Result<Wishlist> {
        let mut items = self.items.lock().await;
        if items.contains(&product_id) {
            return Ok(items.clone());
        }

        let mut next = items.clone();
        next.insert(product_id.clone());
        self.persist(&next).await?;
        *items = next;

        self.notifier.success("Added to wishlist");
        add_breadcrumb(
            "wishlist",
            "Added to wishlist",
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(items.clone())
    }

    /// Remove a product. Removing a product that is not wishlisted changes
    /// nothing.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be written; the
    /// wishlist is then left as it was.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn remove(&self, product_id: ProductId) -> Result<Wishlist> {
        let mut items = self.items.lock().await;
        if !items.contains(&product_id) {
            return Ok(items.clone());
        }

        let mut next = items.clone();
        next.remove(&product_id);
        self.persist(&next).await?;
        *items = next;

        self.notifier.success("Removed from wishlist");
        add_breadcrumb(
            "wishlist",
            "Removed from wishlist",
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(items.clone())
    }

    /// Remove the product if wishlisted, otherwise add it.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be written; the
    /// wishlist is then left as it was.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn toggle(&self, product_id: ProductId) -> Result<Wishlist> {
        let mut items = self.items.lock().await;

        let mut next = items.clone();
        let toggled = next.toggle(product_id.clone());
        self.persist(&next).await?;
        *items = next;

        let message = match toggled {
            Toggled::Added => "Added to wishlist",
            Toggled::Removed => "Removed from wishlist",
        };
        self.notifier.success(message);
        add_breadcrumb(
            "wishlist",
            message,
            Some(&[("product_id", product_id.as_str())]),
        );
        Ok(items.clone())
    }

    async fn persist(&self, next: &Wishlist) -> Result<()> {
        match save_json(self.slots.as_ref(), &self.key, next).await {
            Ok(()) => {
                tracing::info!(items = next.len(), "Wishlist saved");
                Ok(())
            }
            Err(e) => {
                let e = StoreError::from(e);
                tracing::error!(error = %e, "Failed to save wishlist to storage");
                self.notifier.error("Failed to save wishlist");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::storage::{MemorySlotStore, StorageError};

    const KEY: &str = "quickcart-wishlist";

    fn id(s: &str) -> ProductId {
        ProductId::parse(s).unwrap()
    }

    async fn open_memory() -> (Arc<MemorySlotStore>, Arc<RecordingNotifier>, WishlistStore) {
        let slots = Arc::new(MemorySlotStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let store = WishlistStore::open(slots.clone(), notifier.clone(), KEY)
            .await
            .unwrap();
        (slots, notifier, store)
    }

    /// Memory slots whose writes can be switched off.
    #[derive(Default)]
    struct FlakySlots {
        inner: MemorySlotStore,
        fail_writes: AtomicBool,
    }

    #[async_trait]
    impl SlotStore for FlakySlots {
        async fn read(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            self.inner.read(key).await
        }

        async fn write(&self, key: &str, value: &str) -> std::result::Result<(), StorageError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(StorageError::Backend("disk full".to_string()));
            }
            self.inner.write(key, value).await
        }

        async fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            self.inner.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let (slots, _, store) = open_memory().await;
        assert!(store.get_all().await.is_empty());
        assert!(!slots.exists(KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_is_idempotent_and_written_through() {
        let (slots, notifier, store) = open_memory().await;

        store.add(id("a")).await.unwrap();
        let wishlist = store.add(id("a")).await.unwrap();

        assert_eq!(wishlist.ids(), [id("a")]);
        assert_eq!(slots.read(KEY).await.unwrap().as_deref(), Some(r#"["a"]"#));
        assert_eq!(notifier.take().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_absent_is_noop() {
        let (_, notifier, store) = open_memory().await;
        store.add(id("a")).await.unwrap();
        notifier.take();

        let wishlist = store.remove(id("b")).await.unwrap();
        assert_eq!(wishlist.ids(), [id("a")]);
        assert!(notifier.notices().is_empty());

        let wishlist = store.remove(id("a")).await.unwrap();
        assert!(wishlist.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_state() {
        let (slots, _, store) = open_memory().await;
        store.add(id("a")).await.unwrap();
        store.add(id("b")).await.unwrap();
        let before = store.get_all().await;

        let once = store.toggle(id("c")).await.unwrap();
        assert!(once.contains(&id("c")));
        let twice = store.toggle(id("c")).await.unwrap();
        assert_eq!(twice, before);

        store.toggle(id("a")).await.unwrap();
        let restored = store.toggle(id("a")).await.unwrap();
        assert!(restored.contains(&id("a")));
        assert_eq!(restored.len(), before.len());

        let persisted: Wishlist =
            serde_json::from_str(&slots.read(KEY).await.unwrap().unwrap()).unwrap();
        assert_eq!(persisted, restored);
    }

    #[tokio::test]
    async fn test_get_all_is_a_copy() {
        let (_, _, store) = open_memory().await;
        store.add(id("a")).await.unwrap();

        let mut copy = store.get_all().await;
        copy.insert(id("b"));

        assert!(!store.contains(&id("b")).await);
        assert_eq!(store.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_loads_existing_slot() {
        let slots = Arc::new(MemorySlotStore::new());
        slots.write(KEY, r#"["1", 2, "1"]"#).await.unwrap();

        let store = WishlistStore::open(slots, Arc::new(RecordingNotifier::new()), KEY)
            .await
            .unwrap();
        assert_eq!(store.get_all().await.ids(), [id("1"), id("2")]);
        assert!(store.contains(&ProductId::from(2_u64)).await);
    }

    #[tokio::test]
    async fn test_open_corrupt_slot() {
        let slots = Arc::new(MemorySlotStore::new());
        slots.write(KEY, "{{").await.unwrap();
        let notifier = Arc::new(RecordingNotifier::new());

        let result = WishlistStore::open(slots.clone(), notifier.clone(), KEY).await;
        assert!(result.is_err());
        assert_eq!(notifier.errors(), vec!["Failed to load wishlist"]);

        let store = WishlistStore::open_or_empty(slots.clone(), notifier.clone(), KEY).await;
        assert!(store.get_all().await.is_empty());
        assert_eq!(slots.read(KEY).await.unwrap().as_deref(), Some("{{"));
    }

    #[tokio::test]
    async fn test_failed_write_leaves_memory_unchanged() {
        let slots = Arc::new(FlakySlots::default());
        let notifier = Arc::new(RecordingNotifier::new());
        let store = WishlistStore::open(slots.clone(), notifier.clone(), KEY)
            .await
            .unwrap();
        store.add(id("a")).await.unwrap();

        slots.fail_writes.store(true, Ordering::SeqCst);
        assert!(store.add(id("b")).await.unwrap_err().is_storage());
        assert!(store.toggle(id("a")).await.unwrap_err().is_storage());
        assert!(store.remove(id("a")).await.unwrap_err().is_storage());

        assert_eq!(store.get_all().await.ids(), [id("a")]);
        assert_eq!(
            notifier.errors(),
            vec![
                "Failed to save wishlist",
                "Failed to save wishlist",
                "Failed to save wishlist",
            ]
        );
    }
}
