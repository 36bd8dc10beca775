//! Store error types and Sentry helpers.
//!
//! Every store operation returns `Result<T, StoreError>`. Failures are also
//! logged and reported to the notifier before they are returned, so callers
//! that only want the legacy "empty on failure" behavior can write
//! `.unwrap_or_default()` without losing the user-facing message.

use quickcart_core::{PriceError, ProductId};
use thiserror::Error;

use crate::storage::StorageError;

/// Errors returned by the cart and wishlist stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The durable slot could not be read, decoded, or written.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The product has no line in the cart.
    #[error("item not found in cart: {0}")]
    NotFound(ProductId),

    /// A quantity outside the accepted range.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// A price below zero.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),
}

impl StoreError {
    /// Whether the error comes from the storage backend rather than the input.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Add a breadcrumb for a store action.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of cart and
/// wishlist actions leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Item added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
