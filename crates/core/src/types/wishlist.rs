//! Wishlist snapshot.

use serde::{Deserialize, Serialize};

use super::product_id::ProductId;

/// Outcome of [`Wishlist::toggle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggled {
    /// The product was not wishlisted and now is.
    Added,
    /// The product was wishlisted and no longer is.
    Removed,
}

/// Ordered set of favorited product ids.
///
/// Serialized as a bare JSON array. Repeated ids in stored data collapse to
/// their first occurrence on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Wishlist {
    #[serde(deserialize_with = "deserialize_unique")]
    ids: Vec<ProductId>,
}

impl Wishlist {
    /// An empty wishlist.
    #[must_use]
    pub const fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// Wishlisted ids in the order they were added.
    #[must_use]
    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    /// Iterate over ids in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, ProductId> {
        self.ids.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.ids.contains(product_id)
    }

    /// Append a product. Returns `false` if it was already present.
    pub fn insert(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        self.ids.push(product_id);
        true
    }

    /// Remove a product. Returns `false` if it was not present.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| id != product_id);
        self.ids.len() != before
    }

    /// Remove the product if present, otherwise add it.
    pub fn toggle(&mut self, product_id: ProductId) -> Toggled {
        if self.remove(&product_id) {
            Toggled::Removed
        } else {
            self.ids.push(product_id);
            Toggled::Added
        }
    }
}

impl<'a> IntoIterator for &'a Wishlist {
    type Item = &'a ProductId;
    type IntoIter = std::slice::Iter<'a, ProductId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

impl FromIterator<ProductId> for Wishlist {
    fn from_iter<I: IntoIterator<Item = ProductId>>(iter: I) -> Self {
        let mut wishlist = Self::new();
        for id in iter {
            wishlist.insert(id);
        }
        wishlist
    }
}

fn deserialize_unique<'de, D>(deserializer: D) -> Result<Vec<ProductId>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Vec::<ProductId>::deserialize(deserializer)?;
    Ok(raw.into_iter().collect::<Wishlist>().ids)
}
