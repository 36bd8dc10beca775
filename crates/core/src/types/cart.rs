//! Cart snapshot and line items.
//!
//! A [`Cart`] is the full value stored in the cart slot: an ordered list of
//! [`CartLineItem`]s, unique by product id. All mutations here are pure; the
//! store loads a snapshot, applies one of these, and writes it back whole.
//!
//! # Serialized form
//!
//! ```json
//! [{"productId": "p1", "quantity": 2, "priceAtAdd": 9.99}]
//! ```

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::price::Price;
use super::product_id::ProductId;

/// Largest count the header badge shows before collapsing to "9+".
const BADGE_MAX: u64 = 9;

/// One product's quantity and captured price within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// The product this line refers to (not owned by the cart).
    pub product_id: ProductId,
    /// Units in the cart; a line never exists with zero units.
    pub quantity: NonZeroU32,
    /// Unit price captured when the line was first added.
    pub price_at_add: Price,
}

impl CartLineItem {
    /// Create a new line item.
    #[must_use]
    pub const fn new(product_id: ProductId, quantity: NonZeroU32, price_at_add: Price) -> Self {
        Self {
            product_id,
            quantity,
            price_at_add,
        }
    }

    /// Quantity times the captured unit price.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price_at_add.times(self.quantity.get())
    }
}

/// Outcome of [`Cart::update_quantity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now holds exactly the requested quantity.
    Updated,
    /// The requested quantity was zero or less, so the line was dropped.
    Removed,
}

/// Ordered, product-unique list of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    #[serde(deserialize_with = "deserialize_merged")]
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Iterate over line items in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line for `product_id`.
    #[must_use]
    pub fn get(&self, product_id: &ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|item| &item.product_id == product_id)
    }

    /// Add `quantity` units of a product.
    ///
    /// An existing line keeps its original `price_at_add` and grows by
    /// `quantity` (saturating). A new product is appended at the end.
    pub fn add(&mut self, product_id: ProductId, quantity: NonZeroU32, price_at_add: Price) {
        if let Some(existing) = self.get_mut(&product_id) {
            existing.quantity = existing.quantity.saturating_add(quantity.get());
        } else {
            self.items
                .push(CartLineItem::new(product_id, quantity, price_at_add));
        }
    }

    /// Set a line's quantity exactly, or drop the line when `quantity` is `None`.
    ///
    /// Returns `None` when the product is not in the cart.
    pub fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: Option<NonZeroU32>,
    ) -> Option<QuantityUpdate> {
        let index = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)?;

        match quantity {
            Some(quantity) => {
                if let Some(item) = self.items.get_mut(index) {
                    item.quantity = quantity;
                }
                Some(QuantityUpdate::Updated)
            }
            None => {
                self.items.remove(index);
                Some(QuantityUpdate::Removed)
            }
        }
    }

    /// Remove a product's line. Returns whether anything was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.product_id != product_id);
        self.items.len() != before
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity.get()))
            .sum()
    }

    /// Sum of quantity times captured price across all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    fn get_mut(&mut self, product_id: &ProductId) -> Option<&mut CartLineItem> {
        self.items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<CartLineItem> for Cart {
    /// Collect lines, merging repeated products into their first occurrence.
    fn from_iter<I: IntoIterator<Item = CartLineItem>>(iter: I) -> Self {
        let mut cart = Self::new();
        for item in iter {
            cart.add(item.product_id, item.quantity, item.price_at_add);
        }
        cart
    }
}

fn deserialize_merged<'de, D>(deserializer: D) -> Result<Vec<CartLineItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<CartLineItem>::deserialize(deserializer)?;
    Ok(raw.into_iter().collect::<Cart>().items)
}

/// Text for the header cart badge.
///
/// Returns `None` when the cart is empty, so no badge is drawn.
#[must_use]
pub fn badge_label(count: u64) -> Option<String> {
    match count {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}
