#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use parfum_store::prelude::*;
use parfum_store::AuthUser;

pub const ADMIN_TOKEN: &str = "admin-token";
pub const CLIENT_TOKEN: &str = "client-token";

fn sku(id: &str, product: &str, size_ml: i32, price_bani: i64, stock: i32) -> Sku {
    let mut sku = Sku::new(id, product, size_ml, price_bani);
    sku.stock = stock;
    sku
}

fn set(
    id: &str,
    slots: i32,
    price_bani: i64,
    active: bool,
    customizable: bool,
) -> DiscoverySetConfig {
    DiscoverySetConfig {
        id: DiscoverySetId::new(id),
        name: format!("Set {}", id),
        description: None,
        total_slots: slots,
        slot_volume_ml: 2,
        base_price_bani: price_bani,
        is_active: active,
        is_customizable: customizable,
    }
}

/// A small shop: four products (one without SKUs), three discovery sets,
/// one admin and one regular customer.
pub fn fixture() -> Fixture {
    let mut aventus = Product::new("p-aventus", "Aventus", "Creed");
    aventus.top_notes = vec!["Ananas".into(), "Bergamotă".into()];
    let santal = Product::new("p-santal", "Santal 33", "Le Labo");
    let oud = Product::new("p-oud", "Oud Wood", "Tom Ford");
    let egoiste = Product::new("p-egoiste", "Égoïste", "Chanel");

    Fixture {
        products: vec![aventus, santal, oud, egoiste],
        skus: vec![
            sku("s-aventus-2", "p-aventus", 2, 5000, 10),
            sku("s-aventus-10", "p-aventus", 10, 20000, 3),
            sku("s-santal-2", "p-santal", 2, 4500, 8),
            sku("s-oud-5", "p-oud", 5, 9000, 0),
        ],
        discovery_sets: vec![
            set("set-duo", 2, 8000, true, false),
            set("set-custom", 2, 9900, true, true),
            set("set-retired", 2, 7000, false, true),
        ],
        discovery_set_items: vec![
            DiscoverySetItem {
                id: DiscoverySetItemId::new("i2"),
                config_id: DiscoverySetId::new("set-duo"),
                slot_index: 2,
                sku_id: SkuId::new("s-santal-2"),
            },
            DiscoverySetItem {
                id: DiscoverySetItemId::new("i1"),
                config_id: DiscoverySetId::new("set-duo"),
                slot_index: 1,
                sku_id: SkuId::new("s-aventus-2"),
            },
        ],
        recommendations: vec![
            DiscoveryRecommendation {
                id: RecommendationId::new("r-santal"),
                config_id: Some(DiscoverySetId::new("set-custom")),
                product_id: ProductId::new("p-santal"),
                position: 1,
            },
            DiscoveryRecommendation {
                id: RecommendationId::new("r-aventus"),
                config_id: None,
                product_id: ProductId::new("p-aventus"),
                position: 0,
            },
        ],
        users: vec![
            AuthUser {
                id: UserId::new("u-admin"),
                email: Some("admin@parfum.ro".into()),
            },
            AuthUser {
                id: UserId::new("u-client"),
                email: Some("client@example.ro".into()),
            },
        ],
        admins: vec![UserId::new("u-admin")],
        sessions: BTreeMap::from([
            (ADMIN_TOKEN.to_string(), UserId::new("u-admin")),
            (CLIENT_TOKEN.to_string(), UserId::new("u-client")),
        ]),
        ..Fixture::default()
    }
}

pub struct Shop {
    pub backend: Arc<MemoryBackend>,
    pub cache: Arc<QueryCache>,
    pub storefront: Storefront<MemoryBackend>,
}

pub fn shop() -> Shop {
    shop_from(fixture())
}

pub fn shop_from(fixture: Fixture) -> Shop {
    let backend = Arc::new(MemoryBackend::from_fixture(fixture));
    let cache = Arc::new(QueryCache::new());
    let storefront = Storefront::new(backend.clone(), cache.clone());
    Shop {
        backend,
        cache,
        storefront,
    }
}

pub async fn admin(shop: &Shop) -> AdminConsole<MemoryBackend> {
    AdminConsole::authorize(shop.backend.clone(), shop.cache.clone(), ADMIN_TOKEN)
        .await
        .unwrap()
}

pub fn form(name: &str) -> CheckoutForm {
    CheckoutForm {
        customer_name: name.to_string(),
        customer_email: format!("{}@example.ro", name.to_lowercase()),
        customer_phone: "0722 123 456".to_string(),
        shipping_address: ShippingAddress::new("Str. Florilor 12", "Iași"),
        notes: None,
    }
}

/// Place an order for `quantity` 2 ml Aventus samples.
pub async fn place(shop: &Shop, name: &str, quantity: i64) -> Order {
    let mut cart = Cart::new();
    shop.storefront
        .add_sku_to_cart(&mut cart, &SkuId::new("s-aventus-2"), quantity)
        .await
        .unwrap();
    shop.storefront
        .place_order(&mut cart, form(name))
        .await
        .unwrap()
        .order
}
