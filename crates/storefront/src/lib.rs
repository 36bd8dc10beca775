//! QuickCart Storefront library.
//!
//! This crate provides the storefront's client-side state: a shopping cart
//! and a wishlist, each persisted to a durable key-value slot.
//!
//! # Architecture
//!
//! - [`storage`] - Slot backends behind the [`storage::SlotStore`] trait
//! - [`services`] - `CartStore` and `WishlistStore`
//! - [`notify`] - User-facing notices raised by the stores
//! - [`state`] - `Storefront`, both stores wired from one configuration
//!
//! Catalog and order data come from external gateways and never pass through
//! this crate; the cart only keeps product ids and the price captured when an
//! item was added.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notify;
pub mod services;
pub mod state;
pub mod storage;

pub use error::{Result, StoreError};
pub use state::Storefront;
