//! Storefront stores.
//!
//! # Services
//!
//! - `cart` - Shopping cart with line items, quantities and captured prices
//! - `wishlist` - Favorited products, independent of the cart
//!
//! Both stores take their slot backend and notifier as constructor arguments,
//! so tests can run them against [`crate::storage::MemorySlotStore`] and
//! [`crate::notify::RecordingNotifier`].

pub mod cart;
pub mod wishlist;

pub use cart::CartStore;
pub use wishlist::WishlistStore;
