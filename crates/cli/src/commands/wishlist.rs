//! Wishlist commands.
//!
//! # Usage
//!
//! ```bash
//! qc wishlist list
//! qc wishlist add p1
//! qc wishlist remove p1
//! qc wishlist toggle p1
//! ```

use quickcart_core::ProductId;
use quickcart_storefront::Storefront;

use super::{CommandError, emit, render};

pub async fn list(storefront: &Storefront) -> Result<(), CommandError> {
    let wishlist = storefront.wishlist().get_all().await;
    emit(&render(&wishlist)?);
    Ok(())
}

pub async fn add(storefront: &Storefront, product_id: ProductId) -> Result<(), CommandError> {
    let wishlist = storefront.wishlist().add(product_id).await?;
    emit(&render(&wishlist)?);
    Ok(())
}

pub async fn remove(storefront: &Storefront, product_id: ProductId) -> Result<(), CommandError> {
    let wishlist = storefront.wishlist().remove(product_id).await?;
    emit(&render(&wishlist)?);
    Ok(())
}

pub async fn toggle(storefront: &Storefront, product_id: ProductId) -> Result<(), CommandError> {
    let wishlist = storefront.wishlist().toggle(product_id).await?;
    emit(&render(&wishlist)?);
    Ok(())
}
