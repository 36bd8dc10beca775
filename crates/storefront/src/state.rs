//! Storefront state shared across the view layer.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::notify::Notifier;
use crate::services::{CartStore, WishlistStore};
use crate::storage::{self, SlotStore};

/// Cart and wishlist stores built from one configuration.
///
/// This struct is cheaply cloneable via `Arc`; every clone shares the same
/// stores, so mutations stay serialized across clones.
#[derive(Clone)]
pub struct Storefront {
    inner: Arc<StorefrontInner>,
}

struct StorefrontInner {
    config: StorefrontConfig,
    cart: CartStore,
    wishlist: WishlistStore,
}

impl Storefront {
    /// Open the stores on the backend selected by `config`.
    ///
    /// A wishlist slot that cannot be loaded is reported to `notifier` and
    /// the wishlist starts empty; the cart is unaffected.
    pub async fn open(config: StorefrontConfig, notifier: Arc<dyn Notifier>) -> Self {
        let slots = storage::open(&config.storage);
        Self::with_slots(config, slots, notifier).await
    }

    /// Open the stores on an explicit slot backend.
    pub async fn with_slots(
        config: StorefrontConfig,
        slots: Arc<dyn SlotStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let cart = CartStore::new(
            Arc::clone(&slots),
            Arc::clone(&notifier),
            config.storage.cart_key.clone(),
        );
        let wishlist =
            WishlistStore::open_or_empty(slots, notifier, config.storage.wishlist_key.clone())
                .await;

        Self {
            inner: Arc::new(StorefrontInner {
                config,
                cart,
                wishlist,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &CartStore {
        &self.inner.cart
    }

    /// Get a reference to the wishlist store.
    #[must_use]
    pub fn wishlist(&self) -> &WishlistStore {
        &self.inner.wishlist
    }
}
