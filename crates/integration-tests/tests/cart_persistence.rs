//! Integration tests for cart persistence on the file backend.
//!
//! Each test opens the storefront more than once on the same directory to
//! check that snapshots survive a restart.

#![allow(clippy::unwrap_used)]

use quickcart_core::{Price, ProductId};
use quickcart_integration_tests::TestContext;
use quickcart_storefront::StoreError;
use rust_decimal::Decimal;

fn id(s: &str) -> ProductId {
    ProductId::parse(s).unwrap()
}

// =============================================================================
// Scenario
// =============================================================================

#[tokio::test]
async fn test_add_add_remove_scenario() {
    let ctx = TestContext::new();
    let storefront = ctx.open().await;
    let cart = storefront.cart();

    let snapshot = cart.add_item(id("p1"), 2, Decimal::new(999, 2)).await.unwrap();
    assert_eq!(
        serde_json::to_value(&snapshot).unwrap(),
        serde_json::json!([{"productId": "p1", "quantity": 2, "priceAtAdd": 9.99}])
    );
    assert_eq!(cart.total().await.unwrap().amount(), Decimal::new(1998, 2));

    let snapshot = cart.add_item(id("p1"), 1, Decimal::new(999, 2)).await.unwrap();
    assert_eq!(snapshot.get(&id("p1")).unwrap().quantity.get(), 3);
    assert_eq!(cart.total().await.unwrap().amount(), Decimal::new(2997, 2));

    let snapshot = cart.remove_item(id("p1")).await.unwrap();
    assert!(snapshot.is_empty());
    assert_eq!(cart.total().await.unwrap(), Price::ZERO);
}

// =============================================================================
// Durability
// =============================================================================

#[tokio::test]
async fn test_cart_survives_restart() {
    let ctx = TestContext::new();
    {
        let storefront = ctx.open().await;
        storefront
            .cart()
            .add_item(id("p1"), 2, Decimal::new(999, 2))
            .await
            .unwrap();
        storefront
            .cart()
            .add_item(ProductId::from(17_u64), 1, Decimal::new(450, 2))
            .await
            .unwrap();
    }

    let reopened = ctx.open().await;
    let cart = reopened.cart().get_cart().await.unwrap();
    let order: Vec<&str> = cart.iter().map(|line| line.product_id.as_str()).collect();
    assert_eq!(order, ["p1", "17"]);
    assert_eq!(reopened.cart().item_count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_price_is_not_recomputed_after_restart() {
    let ctx = TestContext::new();
    ctx.open()
        .await
        .cart()
        .add_item(id("p1"), 1, Decimal::new(1000, 2))
        .await
        .unwrap();

    let reopened = ctx.open().await;
    let cart = reopened
        .cart()
        .add_item(id("p1"), 1, Decimal::new(1500, 2))
        .await
        .unwrap();
    assert_eq!(
        cart.get(&id("p1")).unwrap().price_at_add.amount(),
        Decimal::new(1000, 2)
    );
}

#[tokio::test]
async fn test_clear_removes_slot_file() {
    let ctx = TestContext::new();
    let storefront = ctx.open().await;
    storefront
        .cart()
        .add_item(id("p1"), 1, Decimal::ONE)
        .await
        .unwrap();
    assert!(ctx.dir().join("quickcart_cart.json").exists());

    storefront.cart().clear_cart().await.unwrap();

    assert!(!ctx.dir().join("quickcart_cart.json").exists());
    assert!(!ctx.slots().exists("quickcart_cart").await.unwrap());
    assert!(ctx.open().await.cart().get_cart().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reads_cart_written_by_browser_client() {
    let ctx = TestContext::new();
    ctx.slots()
        .write(
            "quickcart_cart",
            r#"[{"productId":"3","quantity":2,"priceAtAdd":19.5},{"productId":"8","quantity":1,"priceAtAdd":5}]"#,
        )
        .await
        .unwrap();

    let storefront = ctx.open().await;
    assert_eq!(storefront.cart().item_count().await.unwrap(), 3);
    assert_eq!(
        storefront.cart().total().await.unwrap().amount(),
        Decimal::new(4400, 2)
    );
}

// =============================================================================
// Failures
// =============================================================================

#[tokio::test]
async fn test_update_missing_item_reports_not_found() {
    let ctx = TestContext::new();
    let storefront = ctx.open().await;

    let result = storefront.cart().update_quantity(id("ghost"), 2).await;
    assert!(matches!(result, Err(StoreError::NotFound(_))));
    assert_eq!(ctx.notifier.errors(), vec!["Item not found in cart"]);
    assert!(result.unwrap_or_default().is_empty());
}

#[tokio::test]
async fn test_corrupt_slot_file_is_not_overwritten_by_reads() {
    let ctx = TestContext::new();
    ctx.slots()
        .write("quickcart_cart", "this is not json")
        .await
        .unwrap();

    let storefront = ctx.open().await;
    assert!(storefront.cart().get_cart().await.unwrap_err().is_storage());
    assert_eq!(storefront.cart().get_cart().await.unwrap_or_default().len(), 0);
    assert_eq!(
        ctx.slots().read("quickcart_cart").await.unwrap().as_deref(),
        Some("this is not json")
    );
}
