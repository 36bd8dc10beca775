//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! qc cart show
//! qc cart add p1 --price 9.99 --quantity 2
//! qc cart update p1 5
//! qc cart remove p1
//! qc cart clear
//! qc cart count
//! qc cart total
//! ```

use quickcart_core::{Cart, ProductId, badge_label};
use quickcart_storefront::Storefront;
use rust_decimal::Decimal;
use serde::Serialize;

use super::{CommandError, emit, render};

/// Totals printed by `qc cart count` and `qc cart total`.
#[derive(Debug, Serialize)]
struct CartSummary {
    lines: usize,
    items: u64,
    total: String,
    badge: Option<String>,
}

impl From<&Cart> for CartSummary {
    fn from(cart: &Cart) -> Self {
        let items = cart.item_count();
        Self {
            lines: cart.len(),
            items,
            total: cart.total().display(),
            badge: badge_label(items),
        }
    }
}

pub async fn show(storefront: &Storefront) -> Result<(), CommandError> {
    let cart = storefront.cart().get_cart().await?;
    emit(&render(&cart)?);
    Ok(())
}

pub async fn add(
    storefront: &Storefront,
    product_id: ProductId,
    quantity: u32,
    price: Decimal,
) -> Result<(), CommandError> {
    let cart = storefront
        .cart()
        .add_item(product_id, quantity, price)
        .await?;
    emit(&render(&cart)?);
    Ok(())
}

pub async fn update(
    storefront: &Storefront,
    product_id: ProductId,
    quantity: i64,
) -> Result<(), CommandError> {
    let cart = storefront
        .cart()
        .update_quantity(product_id, quantity)
        .await?;
    emit(&render(&cart)?);
    Ok(())
}

pub async fn remove(storefront: &Storefront, product_id: ProductId) -> Result<(), CommandError> {
    let cart = storefront.cart().remove_item(product_id).await?;
    emit(&render(&cart)?);
    Ok(())
}

pub async fn clear(storefront: &Storefront) -> Result<(), CommandError> {
    let cart = storefront.cart().clear_cart().await?;
    emit(&render(&cart)?);
    Ok(())
}

pub async fn count(storefront: &Storefront) -> Result<(), CommandError> {
    let count = storefront.cart().item_count().await?;
    emit(&count.to_string());
    Ok(())
}

pub async fn total(storefront: &Storefront) -> Result<(), CommandError> {
    let cart = storefront.cart().get_cart().await?;
    emit(&render(&CartSummary::from(&cart))?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::num::NonZeroU32;

    use quickcart_core::Price;

    use super::*;

    #[test]
    fn test_summary() {
        let mut cart = Cart::new();
        cart.add(
            ProductId::parse("p1").unwrap(),
            NonZeroU32::new(12).unwrap(),
            Price::from_cents(250).unwrap(),
        );

        let summary = CartSummary::from(&cart);
        assert_eq!(summary.lines, 1);
        assert_eq!(summary.items, 12);
        assert_eq!(summary.total, "$30.00");
        assert_eq!(summary.badge.as_deref(), Some("9+"));
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let json = render(&CartSummary::from(&Cart::new())).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"lines": 0, "items": 0, "total": "$0.00", "badge": null})
        );
    }
}
