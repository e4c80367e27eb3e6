//! In-memory backend.
//!
//! Holds every table in a [`Fixture`] behind a tokio `RwLock`. Fixtures are
//! plain JSON, so a shop can be seeded from a file, worked on offline and
//! written back.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use parfum_commerce::prelude::*;
use parfum_data::FetchError;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::{Backend, Result};
use crate::error::StoreError;
use crate::models::{AuthUser, BrandImage, SearchEvent};

/// Every table the backend serves.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub skus: Vec<Sku>,
    #[serde(default)]
    pub discovery_sets: Vec<DiscoverySetConfig>,
    #[serde(default)]
    pub discovery_set_items: Vec<DiscoverySetItem>,
    #[serde(default)]
    pub recommendations: Vec<DiscoveryRecommendation>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub order_items: Vec<OrderItem>,
    #[serde(default)]
    pub brand_images: Vec<BrandImage>,
    #[serde(default)]
    pub search_events: Vec<SearchEvent>,
    #[serde(default)]
    pub users: Vec<AuthUser>,
    #[serde(default)]
    pub admins: Vec<UserId>,
    /// Access token to user id.
    #[serde(default)]
    pub sessions: BTreeMap<String, UserId>,
}

#[derive(Debug)]
pub struct MemoryBackend {
    state: RwLock<Fixture>,
    objects: RwLock<HashMap<String, Vec<u8>>>,
    failing: RwLock<HashSet<&'static str>>,
    public_base: String,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::from_fixture(Fixture::default())
    }

    pub fn from_fixture(fixture: Fixture) -> Self {
        Self {
            state: RwLock::new(fixture),
            objects: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            public_base: "memory://storage".to_string(),
        }
    }

    /// Load a JSON fixture file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
        let fixture: Fixture = serde_json::from_str(&text)
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))?;
        tracing::debug!(
            path = %path.display(),
            products = fixture.products.len(),
            orders = fixture.orders.len(),
            "loaded fixture"
        );
        Ok(Self::from_fixture(fixture))
    }

    /// Write the current tables back to a JSON file.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(&*self.state.read().await)
            .map_err(|e| StoreError::Fixture(e.to_string()))?;
        tokio::fs::write(path, text)
            .await
            .map_err(|e| StoreError::Fixture(format!("{}: {}", path.display(), e)))
    }

    pub fn with_public_base(mut self, base: impl Into<String>) -> Self {
        self.public_base = base.into();
        self
    }

    /// Copy of the current tables.
    pub async fn snapshot(&self) -> Fixture {
        self.state.read().await.clone()
    }

    /// Bytes stored at `bucket/path`.
    pub async fn object(&self, bucket: &str, path: &str) -> Option<Vec<u8>> {
        self.objects
            .read()
            .await
            .get(&format!("{}/{}", bucket, path))
            .cloned()
    }

    /// Make every later call to `operation` fail as if the service were down.
    pub async fn fail_on(&self, operation: &'static str) {
        self.failing.write().await.insert(operation);
    }

    pub async fn recover(&self, operation: &'static str) {
        self.failing.write().await.remove(operation);
    }

    async fn check(&self, operation: &'static str) -> Result<()> {
        if self.failing.read().await.contains(operation) {
            return Err(StoreError::Fetch(FetchError::HttpError {
                status: 503,
                message: format!("{} unavailable", operation),
            }));
        }
        Ok(())
    }
}

fn upsert_by<T: Clone>(rows: &mut Vec<T>, row: &T, same: impl Fn(&T) -> bool) -> T {
    match rows.iter_mut().find(|r| same(r)) {
        Some(existing) => *existing = row.clone(),
        None => rows.push(row.clone()),
    }
    row.clone()
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.check("list_products").await?;
        let mut products = self.state.read().await.products.clone();
        products.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(products)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        self.check("get_product").await?;
        let state = self.state.read().await;
        Ok(state.products.iter().find(|p| &p.id == id).cloned())
    }

    async fn upsert_product(&self, product: &Product) -> Result<Product> {
        self.check("upsert_product").await?;
        let mut state = self.state.write().await;
        Ok(upsert_by(&mut state.products, product, |p| p.id == product.id))
    }

    async fn list_skus(&self) -> Result<Vec<Sku>> {
        self.check("list_skus").await?;
        let mut skus = self.state.read().await.skus.clone();
        skus.sort_by_key(|s| s.size_ml);
        Ok(skus)
    }

    async fn list_skus_for_products(&self, product_ids: &[ProductId]) -> Result<Vec<Sku>> {
        self.check("list_skus").await?;
        let state = self.state.read().await;
        let mut skus: Vec<Sku> = state
            .skus
            .iter()
            .filter(|s| product_ids.contains(&s.product_id))
            .cloned()
            .collect();
        skus.sort_by_key(|s| s.size_ml);
        Ok(skus)
    }

    async fn get_skus(&self, ids: &[SkuId]) -> Result<Vec<Sku>> {
        self.check("get_skus").await?;
        let state = self.state.read().await;
        Ok(state
            .skus
            .iter()
            .filter(|s| ids.contains(&s.id))
            .cloned()
            .collect())
    }

    async fn upsert_sku(&self, sku: &Sku) -> Result<Sku> {
        self.check("upsert_sku").await?;
        let mut state = self.state.write().await;
        Ok(upsert_by(&mut state.skus, sku, |s| s.id == sku.id))
    }

    async fn list_discovery_sets(&self, active_only: bool) -> Result<Vec<DiscoverySetConfig>> {
        self.check("list_discovery_sets").await?;
        let state = self.state.read().await;
        let mut sets: Vec<DiscoverySetConfig> = state
            .discovery_sets
            .iter()
            .filter(|c| !active_only || c.is_active)
            .cloned()
            .collect();
        sets.sort_by_key(|c| c.total_slots);
        Ok(sets)
    }

    async fn get_discovery_set(&self, id: &DiscoverySetId) -> Result<Option<DiscoverySetConfig>> {
        self.check("get_discovery_set").await?;
        let state = self.state.read().await;
        Ok(state.discovery_sets.iter().find(|c| &c.id == id).cloned())
    }

    async fn list_discovery_set_items(
        &self,
        config_id: &DiscoverySetId,
    ) -> Result<Vec<DiscoverySetItem>> {
        self.check("list_discovery_set_items").await?;
        let state = self.state.read().await;
        let mut items: Vec<DiscoverySetItem> = state
            .discovery_set_items
            .iter()
            .filter(|i| &i.config_id == config_id)
            .cloned()
            .collect();
        items.sort_by_key(|i| i.slot_index);
        Ok(items)
    }

    async fn list_recommendations(
        &self,
        config_id: Option<&DiscoverySetId>,
    ) -> Result<Vec<DiscoveryRecommendation>> {
        self.check("list_recommendations").await?;
        let state = self.state.read().await;
        let mut recs: Vec<DiscoveryRecommendation> = state
            .recommendations
            .iter()
            .filter(|r| match (config_id, &r.config_id) {
                (Some(wanted), Some(own)) => wanted == own,
                _ => true,
            })
            .cloned()
            .collect();
        recs.sort_by_key(|r| r.position);
        Ok(recs)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
        self.check("insert_order").await?;
        let order = order.clone().into_order(OrderId::generate(), Utc::now());
        self.state.write().await.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>> {
        self.check("insert_order_items").await?;
        let mut state = self.state.write().await;
        if !state.orders.iter().any(|o| &o.id == order_id) {
            return Err(StoreError::not_found("Order", order_id));
        }
        let items: Vec<OrderItem> = items
            .iter()
            .map(|item| item.clone().into_item(OrderItemId::generate(), order_id.clone()))
            .collect();
        state.order_items.extend(items.iter().cloned());
        Ok(items)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        self.check("list_orders").await?;
        let state = self.state.read().await;
        let mut orders: Vec<Order> = state
            .orders
            .iter()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        self.check("get_order").await?;
        let state = self.state.read().await;
        Ok(state.orders.iter().find(|o| &o.id == id).cloned())
    }

    async fn list_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>> {
        self.check("list_order_items").await?;
        let state = self.state.read().await;
        Ok(state
            .order_items
            .iter()
            .filter(|i| &i.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        self.check("update_order_status").await?;
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;
        order.status = status;
        Ok(order.clone())
    }

    async fn update_order_shipping(
        &self,
        id: &OrderId,
        shipping_bani: i64,
        total_bani: i64,
    ) -> Result<Order> {
        self.check("update_order_shipping").await?;
        let mut state = self.state.write().await;
        let order = state
            .orders
            .iter_mut()
            .find(|o| &o.id == id)
            .ok_or_else(|| StoreError::not_found("Order", id))?;
        order.shipping_bani = shipping_bani;
        order.total_bani = total_bani;
        Ok(order.clone())
    }

    async fn record_search_event(&self, event: &SearchEvent) -> Result<()> {
        self.check("record_search_event").await?;
        self.state.write().await.search_events.push(event.clone());
        Ok(())
    }

    async fn list_brand_images(&self) -> Result<Vec<BrandImage>> {
        self.check("list_brand_images").await?;
        let mut images = self.state.read().await.brand_images.clone();
        images.sort_by(|a, b| a.brand.cmp(&b.brand));
        Ok(images)
    }

    async fn save_brand_image(&self, image: &BrandImage) -> Result<BrandImage> {
        self.check("save_brand_image").await?;
        let mut state = self.state.write().await;
        Ok(upsert_by(&mut state.brand_images, image, |i| i.brand == image.brand))
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<String> {
        self.check("upload_object").await?;
        self.objects
            .write()
            .await
            .insert(format!("{}/{}", bucket, path), bytes);
        Ok(format!("{}/{}/{}", self.public_base, bucket, path))
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        self.check("current_user").await?;
        let state = self.state.read().await;
        let Some(user_id) = state.sessions.get(access_token) else {
            return Ok(None);
        };
        let user = state
            .users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .unwrap_or_else(|| AuthUser {
                id: user_id.clone(),
                email: None,
            });
        Ok(Some(user))
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool> {
        self.check("is_admin").await?;
        Ok(self.state.read().await.admins.contains(user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_draft(total: i64) -> NewOrder {
        NewOrder {
            customer_name: "Ana Pop".to_string(),
            customer_email: "ana@example.ro".to_string(),
            customer_phone: "0722123456".to_string(),
            shipping_address: ShippingAddress::new("Str. Lalelelor 3", "Cluj-Napoca"),
            status: OrderStatus::Placed,
            subtotal_bani: total,
            shipping_bani: 0,
            total_bani: total,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_by_id() {
        let backend = MemoryBackend::new();
        let mut product = Product::new("p1", "Aventus", "Creed");
        backend.upsert_product(&product).await.unwrap();
        product.name = "Aventus Cologne".to_string();
        backend.upsert_product(&product).await.unwrap();

        let products = backend.list_products().await.unwrap();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].name, "Aventus Cologne");
    }

    #[tokio::test]
    async fn test_orders_newest_first_and_filtered() {
        let backend = MemoryBackend::new();
        let first = backend.insert_order(&order_draft(1000)).await.unwrap();
        let second = backend.insert_order(&order_draft(2000)).await.unwrap();
        backend
            .update_order_status(&first.id, OrderStatus::Paid)
            .await
            .unwrap();

        let all = backend.list_orders(&OrderFilter::new()).await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all[0].created_at >= all[1].created_at);

        let paid = backend
            .list_orders(&OrderFilter::new().with_status(OrderStatus::Paid))
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, first.id);
        assert_ne!(paid[0].id, second.id);
    }

    #[tokio::test]
    async fn test_items_need_existing_order() {
        let backend = MemoryBackend::new();
        let err = backend
            .insert_order_items(&OrderId::new("missing"), &[])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_recommendations_scope() {
        let rec = |id: &str, config: Option<&str>, position| DiscoveryRecommendation {
            id: RecommendationId::new(id),
            config_id: config.map(DiscoverySetId::new),
            product_id: ProductId::new("p1"),
            position,
        };
        let backend = MemoryBackend::from_fixture(Fixture {
            recommendations: vec![
                rec("r1", Some("set-5"), 2),
                rec("r2", None, 1),
                rec("r3", Some("set-10"), 0),
            ],
            ..Fixture::default()
        });

        let set5 = DiscoverySetId::new("set-5");
        let ids: Vec<String> = backend
            .list_recommendations(Some(&set5))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id.to_string())
            .collect();
        assert_eq!(ids, ["r2", "r1"]);
        assert_eq!(backend.list_recommendations(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_sessions_and_admins() {
        let backend = MemoryBackend::from_fixture(Fixture {
            admins: vec![UserId::new("u1")],
            sessions: BTreeMap::from([("token".to_string(), UserId::new("u1"))]),
            ..Fixture::default()
        });
        let user = backend.current_user("token").await.unwrap().unwrap();
        assert_eq!(user.id, UserId::new("u1"));
        assert!(backend.is_admin(&user.id).await.unwrap());
        assert!(backend.current_user("other").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upload_and_failure_injection() {
        let backend = MemoryBackend::new().with_public_base("https://cdn.test");
        let url = backend
            .upload_object("brand-images", "creed.png", vec![1, 2, 3], "image/png")
            .await
            .unwrap();
        assert_eq!(url, "https://cdn.test/brand-images/creed.png");
        assert_eq!(backend.object("brand-images", "creed.png").await, Some(vec![1, 2, 3]));

        backend.fail_on("list_products").await;
        let err = backend.list_products().await.unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::RemoteFetch);
        backend.recover("list_products").await;
        assert!(backend.list_products().await.is_ok());
    }

    #[tokio::test]
    async fn test_fixture_file_round_trip() {
        let path =
            std::env::temp_dir().join(format!("parfum-fixture-{}.json", OrderId::generate()));
        let backend = MemoryBackend::new();
        backend
            .upsert_product(&Product::new("p1", "Santal 33", "Le Labo"))
            .await
            .unwrap();
        backend.save(&path).await.unwrap();

        let loaded = MemoryBackend::load(&path).await.unwrap();
        assert_eq!(loaded.snapshot().await.products.len(), 1);
        let _ = std::fs::remove_file(&path);

        assert!(matches!(
            MemoryBackend::load(&path).await,
            Err(StoreError::Fixture(_))
        ));
    }
}
