//! Back-office service.
//!
//! Every [`AdminConsole`] is tied to a session that was checked against the
//! admin list when it was created. Writes invalidate the cached reads they
//! affect; a failed write leaves the cache alone.

use std::sync::Arc;

use parfum_cache::{cache_key, QueryCache};
use parfum_commerce::admin::describe;
use parfum_commerce::prelude::*;
use parfum_observability::OperationTimer;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Result, BRAND_IMAGES_BUCKET};
use crate::error::StoreError;
use crate::models::{AuthUser, BrandImage};

/// An order with its items and the integrity check result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDetail {
    pub order: Order,
    pub items: Vec<OrderItem>,
    pub integrity: IntegrityReport,
}

pub struct AdminConsole<B: ?Sized> {
    backend: Arc<B>,
    cache: Arc<QueryCache>,
    user: AuthUser,
}

impl<B: Backend + ?Sized> AdminConsole<B> {
    /// Open a console for the owner of `access_token`.
    ///
    /// Fails with [`StoreError::Unauthorized`] when the token has no
    /// session and [`StoreError::Forbidden`] when the user is not an admin.
    pub async fn authorize(
        backend: Arc<B>,
        cache: Arc<QueryCache>,
        access_token: &str,
    ) -> Result<Self> {
        if access_token.trim().is_empty() {
            return Err(StoreError::Unauthorized);
        }
        let user = backend
            .current_user(access_token)
            .await?
            .ok_or(StoreError::Unauthorized)?;
        if !backend.is_admin(&user.id).await? {
            tracing::warn!(user_id = %user.id, "non-admin tried to open the admin console");
            return Err(StoreError::Forbidden(user.label()));
        }
        tracing::debug!(user_id = %user.id, "admin session opened");
        Ok(Self {
            backend,
            cache,
            user,
        })
    }

    pub fn user(&self) -> &AuthUser {
        &self.user
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        let key = cache_key!(
            "orders",
            "list",
            filter.status.map_or("any", |s| s.as_str()),
            filter.created_from.map(|d| d.timestamp()).unwrap_or(i64::MIN),
            filter.created_to.map(|d| d.timestamp()).unwrap_or(i64::MAX)
        );
        self.cache
            .get_or_try_insert_with(&key, || self.backend.list_orders(filter))
            .await
    }

    /// One page of the orders table.
    ///
    /// The date range and the view's status go to the backend; search,
    /// total range, sort and paging are applied here.
    pub async fn orders(&self, filter: &OrderFilter, view: &OrdersView) -> Result<OrdersPage> {
        let timer = OperationTimer::start("admin_orders");
        let mut remote = filter.clone();
        if let Some(status) = view.remote_filter().status {
            remote.status = Some(status);
        }
        let orders = self.list_orders(&remote).await?;
        let page = view.apply(&orders);
        timer.finish_with(page.rows.len());
        Ok(page)
    }

    /// The order, its items and whether the stored amounts add up.
    pub async fn order_detail(&self, id: &OrderId) -> Result<OrderDetail> {
        let order: Option<Order> = self
            .cache
            .get_or_try_insert_with(&cache_key!("orders", "detail", id), || {
                self.backend.get_order(id)
            })
            .await?;
        let order = order.ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;

        let items: Vec<OrderItem> = self
            .cache
            .get_or_try_insert_with(&cache_key!("orders", "items", id), || {
                self.backend.list_order_items(id)
            })
            .await?;

        let integrity = check_order_integrity(&order, &items);
        if !integrity.is_clean() {
            tracing::warn!(
                order_id = %id,
                report = %describe(&integrity),
                "order amounts do not add up"
            );
        }
        Ok(OrderDetail {
            order,
            items,
            integrity,
        })
    }

    pub async fn update_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let order = self.backend.update_order_status(id, status).await?;
        self.cache.invalidate_prefix("orders:");
        tracing::info!(
            order_id = %id,
            status = status.as_str(),
            admin = %self.user.id,
            "order status updated"
        );
        Ok(order)
    }

    /// Change the shipping cost; the total follows the stored subtotal.
    pub async fn update_shipping(&self, id: &OrderId, shipping_bani: i64) -> Result<Order> {
        let current = self
            .backend
            .get_order(id)
            .await?
            .ok_or_else(|| CommerceError::OrderNotFound(id.to_string()))?;
        let edited = current.with_shipping(shipping_bani)?;

        let order = self
            .backend
            .update_order_shipping(id, edited.shipping_bani, edited.total_bani)
            .await?;
        self.cache.invalidate_prefix("orders:");
        tracing::info!(
            order_id = %id,
            shipping = %order.shipping().display(),
            total = %order.total().display(),
            "order shipping updated"
        );
        Ok(order)
    }

    /// Upload artwork for a brand and point the brand at it.
    pub async fn save_brand_image(
        &self,
        brand: &str,
        bytes: Vec<u8>,
        content_type: &str,
        extension: &str,
    ) -> Result<BrandImage> {
        let brand = brand.trim();
        if brand.is_empty() {
            return Err(CommerceError::invalid("brand", "Brand is required").into());
        }
        if bytes.is_empty() {
            return Err(CommerceError::invalid("image", "Image file is empty").into());
        }

        let path = BrandImage::object_name(brand, extension);
        let url = self
            .backend
            .upload_object(BRAND_IMAGES_BUCKET, &path, bytes, content_type)
            .await?;
        let image = self
            .backend
            .save_brand_image(&BrandImage::new(brand, url))
            .await?;
        self.cache.invalidate_prefix("brands:");
        tracing::info!(brand, url = %image.image_url, "brand image saved");
        Ok(image)
    }

    pub async fn save_product(&self, draft: ProductDraft) -> Result<Product> {
        let product = draft.validate()?;
        let saved = self.backend.upsert_product(&product).await?;
        self.invalidate_catalog();
        tracing::info!(product_id = %saved.id, name = %saved.name, "product saved");
        Ok(saved)
    }

    pub async fn save_sku(&self, draft: SkuDraft) -> Result<Sku> {
        let sku = draft.validate()?;
        if self.backend.get_product(&sku.product_id).await?.is_none() {
            return Err(CommerceError::ProductNotFound(sku.product_id.to_string()).into());
        }
        let saved = self.backend.upsert_sku(&sku).await?;
        self.invalidate_catalog();
        tracing::info!(sku_id = %saved.id, product_id = %saved.product_id, "SKU saved");
        Ok(saved)
    }

    fn invalidate_catalog(&self) {
        let dropped = self.cache.invalidate_prefix("products:")
            + self.cache.invalidate_prefix("skus:")
            + self.cache.invalidate_prefix("discovery:");
        tracing::debug!(dropped, "catalog cache invalidated");
    }
}
