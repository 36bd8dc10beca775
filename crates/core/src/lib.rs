//! QuickCart Core - Shared domain types.
//!
//! This crate provides the types the storefront stores operate on:
//! - `quickcart-storefront` - Cart and wishlist stores with durable slots
//! - `quickcart-cli` - Command-line access to the same stores
//!
//! # Architecture
//!
//! The core crate contains only types and pure transformations - no I/O, no
//! storage backends, no async. Every cart or wishlist mutation is expressed
//! here as an in-memory change to a snapshot; the stores take care of reading
//! and writing the snapshot around it.
//!
//! # Modules
//!
//! - [`types`] - Product ids, prices, cart line items, cart and wishlist snapshots

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
