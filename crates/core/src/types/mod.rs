//! Core types for QuickCart.
//!
//! This module provides type-safe wrappers for the cart and wishlist domain.

pub mod cart;
pub mod price;
pub mod product_id;
pub mod wishlist;

pub use cart::{Cart, CartLineItem, QuantityUpdate, badge_label};
pub use price::{Price, PriceError};
pub use product_id::{ProductId, ProductIdError};
pub use wishlist::{Toggled, Wishlist};
