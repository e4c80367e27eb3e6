//! The backend seam.
//!
//! Everything the storefront and admin services need from the hosted
//! database, storage and auth goes through [`Backend`]. [`RestBackend`]
//! talks to the real service; [`MemoryBackend`] keeps rows in memory for
//! tests and offline work.
//!
//! [`RestBackend`]: crate::RestBackend
//! [`MemoryBackend`]: crate::MemoryBackend

use async_trait::async_trait;
use parfum_commerce::prelude::*;

use crate::error::StoreError;
use crate::models::{AuthUser, BrandImage, SearchEvent};

pub type Result<T> = std::result::Result<T, StoreError>;

/// Storage bucket for brand artwork.
pub const BRAND_IMAGES_BUCKET: &str = "brand-images";

#[async_trait]
pub trait Backend: Send + Sync {
    // Products

    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>>;

    /// Insert or replace by id.
    async fn upsert_product(&self, product: &Product) -> Result<Product>;

    // SKUs

    async fn list_skus(&self) -> Result<Vec<Sku>>;

    async fn list_skus_for_products(&self, product_ids: &[ProductId]) -> Result<Vec<Sku>>;

    /// SKUs with the given ids. Unknown ids are skipped.
    async fn get_skus(&self, ids: &[SkuId]) -> Result<Vec<Sku>>;

    async fn upsert_sku(&self, sku: &Sku) -> Result<Sku>;

    // Discovery sets

    async fn list_discovery_sets(&self, active_only: bool) -> Result<Vec<DiscoverySetConfig>>;

    async fn get_discovery_set(&self, id: &DiscoverySetId) -> Result<Option<DiscoverySetConfig>>;

    /// Fixed slots of a predefined set, by slot index.
    async fn list_discovery_set_items(
        &self,
        config_id: &DiscoverySetId,
    ) -> Result<Vec<DiscoverySetItem>>;

    /// Suggestions for a set (plus the ones that apply to every set), by
    /// position. `None` lists all of them.
    async fn list_recommendations(
        &self,
        config_id: Option<&DiscoverySetId>,
    ) -> Result<Vec<DiscoveryRecommendation>>;

    // Orders

    async fn insert_order(&self, order: &NewOrder) -> Result<Order>;

    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>>;

    /// Orders matching the filter, newest first.
    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>>;

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>>;

    async fn list_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>>;

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order>;

    async fn update_order_shipping(
        &self,
        id: &OrderId,
        shipping_bani: i64,
        total_bani: i64,
    ) -> Result<Order>;

    // Analytics

    async fn record_search_event(&self, event: &SearchEvent) -> Result<()>;

    // Brand images

    async fn list_brand_images(&self) -> Result<Vec<BrandImage>>;

    /// Insert or replace by brand.
    async fn save_brand_image(&self, image: &BrandImage) -> Result<BrandImage>;

    // Storage and auth

    /// Store an object and return its public URL.
    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String>;

    /// The user owning `access_token`, or `None` if the token is not valid.
    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>>;

    async fn is_admin(&self, user_id: &UserId) -> Result<bool>;
}
