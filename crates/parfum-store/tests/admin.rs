mod common;

use common::{admin, fixture, place, shop, shop_from, CLIENT_TOKEN};
use parfum_store::prelude::*;

#[tokio::test]
async fn test_authorize() {
    let shop = shop();

    let err = AdminConsole::authorize(shop.backend.clone(), shop.cache.clone(), "")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Unauthorized));

    let err = AdminConsole::authorize(shop.backend.clone(), shop.cache.clone(), "expired")
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Unauthorized));

    let err = AdminConsole::authorize(shop.backend.clone(), shop.cache.clone(), CLIENT_TOKEN)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Forbidden(ref who) if who == "client@example.ro"));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);

    let console = admin(&shop).await;
    assert_eq!(console.user().id, UserId::new("u-admin"));
}

#[tokio::test]
async fn test_orders_view() {
    let shop = shop();
    place(&shop, "Ana", 1).await;
    let bogdan = place(&shop, "Bogdan", 3).await;
    place(&shop, "Carmen", 2).await;
    let console = admin(&shop).await;

    let mut view = OrdersView::new();
    view.set_sort(OrderSort::TotalDesc);
    let page = console.orders(&OrderFilter::new(), &view).await.unwrap();
    assert_eq!(page.pagination.total, 3);
    assert_eq!(page.rows[0].id, bogdan.id);

    view.set_search("CARMEN@");
    let page = console.orders(&OrderFilter::new(), &view).await.unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].customer_name, "Carmen");

    // 1 x 50 lei + 15 lei shipping.
    let mut view = OrdersView::new();
    view.set_max_total(Some(65.0));
    let page = console.orders(&OrderFilter::new(), &view).await.unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].customer_name, "Ana");
}

#[tokio::test]
async fn test_status_filter_and_update() {
    let shop = shop();
    let order = place(&shop, "Ana", 1).await;
    place(&shop, "Bogdan", 1).await;
    let console = admin(&shop).await;

    let mut paid = OrdersView::new();
    paid.set_status(Some(OrderStatus::Paid));
    let page = console.orders(&OrderFilter::new(), &paid).await.unwrap();
    assert!(page.is_empty());

    let updated = console
        .update_status(&order.id, OrderStatus::Paid)
        .await
        .unwrap();
    assert_eq!(updated.status, OrderStatus::Paid);

    // The cached list was dropped by the update.
    let page = console.orders(&OrderFilter::new(), &paid).await.unwrap();
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].id, order.id);

    let err = console
        .update_status(&OrderId::new("missing"), OrderStatus::Paid)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_order_detail_integrity() {
    let shop = shop();
    let order = place(&shop, "Ana", 2).await;
    let console = admin(&shop).await;

    let detail = console.order_detail(&order.id).await.unwrap();
    assert_eq!(detail.items.len(), 1);
    assert!(detail.integrity.is_clean());

    let err = console
        .order_detail(&OrderId::new("missing"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_order_detail_flags_tampered_subtotal() {
    let seed = shop();
    let order = place(&seed, "Ana", 2).await;
    let mut data = seed.backend.snapshot().await;
    data.orders[0].subtotal_bani += 500;
    data.orders[0].total_bani += 500;

    let shop = shop_from(data);
    let console = admin(&shop).await;
    let detail = console.order_detail(&order.id).await.unwrap();
    assert!(detail.integrity.subtotal_mismatch);
    assert!(!detail.integrity.totals_mismatch);
    assert_eq!(detail.integrity.difference, Money::new(500));
    assert!(!detail.integrity.warnings().is_empty());
}

#[tokio::test]
async fn test_update_shipping_recomputes_total() {
    let shop = shop();
    let order = place(&shop, "Ana", 1).await;
    let console = admin(&shop).await;

    // Warm the cache so the edit has something to invalidate.
    console.order_detail(&order.id).await.unwrap();

    let updated = console.update_shipping(&order.id, 2500).await.unwrap();
    assert_eq!(updated.shipping_bani, 2500);
    assert_eq!(updated.total_bani, 7500);

    let detail = console.order_detail(&order.id).await.unwrap();
    assert_eq!(detail.order.total_bani, 7500);
    assert!(detail.integrity.is_clean());

    let err = console.update_shipping(&order.id, -1).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_failed_edit_leaves_state() {
    let shop = shop();
    let order = place(&shop, "Ana", 1).await;
    let console = admin(&shop).await;
    console.order_detail(&order.id).await.unwrap();

    shop.backend.fail_on("update_order_shipping").await;
    let err = console.update_shipping(&order.id, 0).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteFetch);

    // Cached detail is still there and the stored order is unchanged.
    assert!(shop.cache.keys().iter().any(|k| k.starts_with("orders:detail:")));
    let detail = console.order_detail(&order.id).await.unwrap();
    assert_eq!(detail.order.shipping_bani, 1500);
}

#[tokio::test]
async fn test_save_brand_image() {
    let shop = shop();
    let console = admin(&shop).await;
    assert!(shop.storefront.brand_images().await.unwrap().is_empty());

    let image = console
        .save_brand_image("Tom Ford", vec![0x89, 0x50], "image/png", "png")
        .await
        .unwrap();
    assert_eq!(image.brand, "Tom Ford");
    assert_eq!(image.image_url, "memory://storage/brand-images/tom-ford.png");
    assert_eq!(
        shop.backend.object(BRAND_IMAGES_BUCKET, "tom-ford.png").await,
        Some(vec![0x89, 0x50])
    );

    let images = shop.storefront.brand_images().await.unwrap();
    assert_eq!(images.len(), 1);

    let err = console
        .save_brand_image("  ", vec![1], "image/png", "png")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_upload_failure_saves_nothing() {
    let shop = shop();
    let console = admin(&shop).await;
    shop.backend.fail_on("upload_object").await;

    let err = console
        .save_brand_image("Creed", vec![1, 2], "image/jpeg", "jpg")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RemoteFetch);
    assert!(shop.backend.snapshot().await.brand_images.is_empty());
}

#[tokio::test]
async fn test_save_product_and_sku() {
    let shop = shop();
    let console = admin(&shop).await;
    assert_eq!(shop.storefront.listings().await.unwrap().len(), 4);

    let err = console
        .save_product(ProductDraft {
            name: "  ".into(),
            brand: "Byredo".into(),
            ..ProductDraft::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err.field_errors()[0].field, "name");

    let product = console
        .save_product(ProductDraft {
            name: "Gypsy Water".into(),
            brand: "Byredo".into(),
            top_notes: vec![" Bergamotă ".into(), "".into()],
            ..ProductDraft::default()
        })
        .await
        .unwrap();
    assert_eq!(product.top_notes, ["Bergamotă"]);

    let sku = console
        .save_sku(SkuDraft {
            id: None,
            product_id: product.id.clone(),
            size_ml: 2,
            price_bani: 5500,
            stock: 4,
            label: None,
        })
        .await
        .unwrap();

    // The storefront sees both after invalidation.
    let listings = shop.storefront.listings().await.unwrap();
    assert_eq!(listings.len(), 5);
    let detail = shop.storefront.product_detail(&product.id).await.unwrap();
    assert_eq!(detail.default_sku.map(|s| s.id), Some(sku.id));
    assert!(shop.storefront.brands().await.unwrap().contains(&"Byredo".to_string()));

    let err = console
        .save_sku(SkuDraft {
            id: None,
            product_id: ProductId::new("p-missing"),
            size_ml: 2,
            price_bani: 100,
            stock: 0,
            label: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_fixture_admin_list_is_respected() {
    let mut data = fixture();
    data.admins.clear();
    let shop = shop_from(data);
    let err = AdminConsole::authorize(shop.backend.clone(), shop.cache.clone(), common::ADMIN_TOKEN)
        .await
        .err()
        .unwrap();
    assert!(matches!(err, StoreError::Forbidden(_)));
}
