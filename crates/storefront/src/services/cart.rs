//! Cart store.
//!
//! The cart lives in a single durable slot as a JSON array of line items.
//! Every mutation reads the whole snapshot, changes it in memory, and writes
//! the whole snapshot back; there is no partial update.
//!
//! Mutations on one `CartStore` are serialized, so overlapping calls from
//! concurrent tasks cannot lose each other's changes. Reads are not locked:
//! backends replace slots atomically, so a read sees either the old or the new
//! snapshot.

use std::num::NonZeroU32;
use std::sync::Arc;

use quickcart_core::{Cart, Price, ProductId, QuantityUpdate};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::error::{Result, StoreError, add_breadcrumb};
use crate::notify::Notifier;
use crate::storage::{SlotStore, load_json, save_json};

/// Durable shopping cart.
pub struct CartStore {
    slots: Arc<dyn SlotStore>,
    notifier: Arc<dyn Notifier>,
    key: String,
    write_lock: Mutex<()>,
}

impl CartStore {
    /// Create a cart store over the slot `key`.
    #[must_use]
    pub fn new(slots: Arc<dyn SlotStore>, notifier: Arc<dyn Notifier>, key: impl Into<String>) -> Self {
        Self {
            slots,
            notifier,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Key of the slot holding this cart.
    #[must_use]
    pub fn slot_key(&self) -> &str {
        &self.key
    }

    /// Current cart snapshot. Empty if the slot has never been written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be read or decoded.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn get_cart(&self) -> Result<Cart> {
        self.load()
            .await
            .inspect_err(|e| self.report(e, "Failed to load cart"))
    }

    /// Add `quantity` units of a product at `price_at_add`.
    ///
    /// If the product is already in the cart its quantity grows and the
    /// originally captured price is kept.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidQuantity` for a zero quantity,
    /// `StoreError::InvalidPrice` for a negative price, and
    /// `StoreError::Storage` if the slot cannot be read or written.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        price_at_add: Decimal,
    ) -> Result<Cart> {
        let result = self.try_add_item(product_id.clone(), quantity, price_at_add).await;
        match &result {
            Ok(_) => {
                self.notifier.success("Item added to cart");
                add_breadcrumb(
                    "cart",
                    "Item added to cart",
                    Some(&[
                        ("product_id", product_id.as_str()),
                        ("quantity", &quantity.to_string()),
                    ]),
                );
            }
            Err(e) => self.report(e, "Failed to add item to cart"),
        }
        result
    }

    /// Add a single unit of a product.
    ///
    /// # Errors
    ///
    /// Same as [`CartStore::add_item`].
    pub async fn add_one(&self, product_id: ProductId, price_at_add: Decimal) -> Result<Cart> {
        self.add_item(product_id, 1, price_at_add).await
    }

    /// Set a line's quantity exactly. Zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the product has no line,
    /// `StoreError::InvalidQuantity` if `new_quantity` exceeds `u32::MAX`, and
    /// `StoreError::Storage` if the slot cannot be read or written.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn update_quantity(&self, product_id: ProductId, new_quantity: i64) -> Result<Cart> {
        match self.try_update_quantity(&product_id, new_quantity).await {
            Ok((cart, QuantityUpdate::Updated)) => {
                self.notifier.success("Cart updated");
                Ok(cart)
            }
            Ok((cart, QuantityUpdate::Removed)) => {
                self.notifier.success("Item removed from cart");
                Ok(cart)
            }
            Err(e @ StoreError::NotFound(_)) => {
                tracing::warn!(error = %e, "Error updating cart quantity");
                self.notifier.error("Item not found in cart");
                Err(e)
            }
            Err(e) => {
                self.report(&e, "Failed to update cart");
                Err(e)
            }
        }
    }

    /// Remove a product's line. Removing an absent product is not an error.
    ///
    /// The snapshot is written back either way.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be read or written.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn remove_item(&self, product_id: ProductId) -> Result<Cart> {
        let result = self
            .mutate(|cart| Ok(cart.remove(&product_id)))
            .await;
        match result {
            Ok((cart, removed)) => {
                tracing::debug!(removed, "Cart line removed");
                self.notifier.success("Item removed from cart");
                Ok(cart)
            }
            Err(e) => {
                self.report(&e, "Failed to remove item");
                Err(e)
            }
        }
    }

    /// Delete the cart slot entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be deleted.
    #[instrument(skip(self), fields(slot = %self.key))]
    pub async fn clear_cart(&self) -> Result<Cart> {
        let result = {
            let _guard = self.write_lock.lock().await;
            self.slots.remove(&self.key).await
        };
        match result {
            Ok(()) => {
                tracing::info!("Cart cleared");
                self.notifier.success("Cart cleared");
                add_breadcrumb("cart", "Cart cleared", None);
                Ok(Cart::new())
            }
            Err(e) => {
                let e = StoreError::from(e);
                self.report(&e, "Failed to clear cart");
                Err(e)
            }
        }
    }

    /// Total units across all lines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be read or decoded.
    pub async fn item_count(&self) -> Result<u64> {
        self.get_cart().await.map(|cart| cart.item_count())
    }

    /// Sum of quantity times captured price across all lines.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Storage` if the slot cannot be read or decoded.
    pub async fn total(&self) -> Result<Price> {
        self.get_cart().await.map(|cart| cart.total())
    }

    async fn try_add_item(
        &self,
        product_id: ProductId,
        quantity: u32,
        price_at_add: Decimal,
    ) -> Result<Cart> {
        let quantity =
            NonZeroU32::new(quantity).ok_or(StoreError::InvalidQuantity(i64::from(quantity)))?;
        let price = Price::new(price_at_add)?;

        let (cart, ()) = self
            .mutate(move |cart| {
                cart.add(product_id, quantity, price);
                Ok(())
            })
            .await?;
        Ok(cart)
    }

    async fn try_update_quantity(
        &self,
        product_id: &ProductId,
        new_quantity: i64,
    ) -> Result<(Cart, QuantityUpdate)> {
        let quantity = if new_quantity <= 0 {
            None
        } else {
            let quantity = u32::try_from(new_quantity)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or(StoreError::InvalidQuantity(new_quantity))?;
            Some(quantity)
        };

        self.mutate(|cart| {
            cart.update_quantity(product_id, quantity)
                .ok_or_else(|| StoreError::NotFound(product_id.clone()))
        })
        .await
    }

    /// Load, apply `change`, and write back under the write lock.
    ///
    /// Nothing is written when `change` fails.
    async fn mutate<T, F>(&self, change: F) -> Result<(Cart, T)>
    where
        F: FnOnce(&mut Cart) -> Result<T> + Send,
        T: Send,
    {
        let _guard = self.write_lock.lock().await;
        let mut cart = self.load().await?;
        let outcome = change(&mut cart)?;
        save_json(self.slots.as_ref(), &self.key, &cart).await?;
        tracing::info!(lines = cart.len(), items = cart.item_count(), "Cart saved");
        Ok((cart, outcome))
    }

    async fn load(&self) -> Result<Cart> {
        let cart = load_json::<Cart>(self.slots.as_ref(), &self.key)
            .await?
            .unwrap_or_default();
        tracing::debug!(lines = cart.len(), "Cart loaded");
        Ok(cart)
    }

    fn report(&self, error: &StoreError, message: &str) {
        tracing::error!(error = %error, slot = %self.key, "{message}");
        self.notifier.error(message);
    }
}
