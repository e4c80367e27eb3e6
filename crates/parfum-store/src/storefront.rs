//! Customer-facing service: catalog reads, cart additions and checkout.

use std::sync::Arc;

use parfum_cache::{cache_key, QueryCache};
use parfum_commerce::prelude::*;
use parfum_observability::OperationTimer;
use serde::{Deserialize, Serialize};

use crate::backend::{Backend, Result};
use crate::error::StoreError;
use crate::models::{BrandImage, SearchEvent};

/// Products per catalog page.
pub const DEFAULT_PAGE_SIZE: i64 = 24;

/// A discovery set with its fixed slots resolved.
///
/// Customizable sets have no fixed slots.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscoverySetDetail {
    pub config: DiscoverySetConfig,
    pub slots: Vec<ResolvedSlot>,
    /// Slots whose SKU or product no longer exists.
    pub missing: Vec<SkuId>,
}

impl DiscoverySetDetail {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// The stored order and its items after a successful checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedOrder {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

pub struct Storefront<B: ?Sized> {
    backend: Arc<B>,
    cache: Arc<QueryCache>,
    shipping: ShippingPolicy,
    page_size: i64,
}

impl<B: Backend + ?Sized> Storefront<B> {
    pub fn new(backend: Arc<B>, cache: Arc<QueryCache>) -> Self {
        Self {
            backend,
            cache,
            shipping: ShippingPolicy::default(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn with_shipping_policy(mut self, policy: ShippingPolicy) -> Self {
        self.shipping = policy;
        self
    }

    pub fn with_page_size(mut self, page_size: i64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn shipping_policy(&self) -> &ShippingPolicy {
        &self.shipping
    }

    pub fn page_size(&self) -> i64 {
        self.page_size
    }

    async fn products(&self) -> Result<Vec<Product>> {
        self.cache
            .get_or_try_insert_with(&cache_key!("products", "all"), || {
                self.backend.list_products()
            })
            .await
    }

    async fn skus(&self) -> Result<Vec<Sku>> {
        self.cache
            .get_or_try_insert_with(&cache_key!("skus", "all"), || self.backend.list_skus())
            .await
    }

    /// Every product with its SKUs and default SKU.
    pub async fn listings(&self) -> Result<Vec<ProductListing>> {
        let (products, skus) = futures::try_join!(self.products(), self.skus())?;
        Ok(build_listings(products, &skus))
    }

    /// Filtered, sorted and paginated catalog.
    pub async fn catalog(&self, query: &CatalogQuery) -> Result<SearchResults<ProductListing>> {
        let listings = self.listings().await?;
        Ok(query.apply(&listings))
    }

    pub async fn product_detail(&self, id: &ProductId) -> Result<ProductListing> {
        let cached: Option<ProductListing> = self
            .cache
            .get_or_try_insert_with(&cache_key!("products", "detail", id), || async {
                let Some(product) = self.backend.get_product(id).await? else {
                    return Ok::<_, StoreError>(None);
                };
                let skus = self
                    .backend
                    .list_skus_for_products(std::slice::from_ref(id))
                    .await?;
                Ok(Some(ProductListing::new(product, skus)))
            })
            .await?;
        cached.ok_or_else(|| CommerceError::ProductNotFound(id.to_string()).into())
    }

    /// Active discovery sets, smallest first.
    pub async fn discovery_sets(&self) -> Result<Vec<DiscoverySetConfig>> {
        self.cache
            .get_or_try_insert_with(&cache_key!("discovery", "sets"), || {
                self.backend.list_discovery_sets(true)
            })
            .await
    }

    async fn discovery_set(&self, id: &DiscoverySetId) -> Result<DiscoverySetConfig> {
        let config: Option<DiscoverySetConfig> = self
            .cache
            .get_or_try_insert_with(&cache_key!("discovery", "set", id), || {
                self.backend.get_discovery_set(id)
            })
            .await?;
        config.ok_or_else(|| CommerceError::DiscoverySetNotFound(id.to_string()).into())
    }

    pub async fn discovery_set_detail(&self, id: &DiscoverySetId) -> Result<DiscoverySetDetail> {
        let config = self.discovery_set(id).await?;
        if config.is_customizable {
            return Ok(DiscoverySetDetail {
                config,
                slots: Vec::new(),
                missing: Vec::new(),
            });
        }

        let items: Vec<DiscoverySetItem> = self
            .cache
            .get_or_try_insert_with(&cache_key!("discovery", "items", id), || {
                self.backend.list_discovery_set_items(id)
            })
            .await?;
        let listings = self.listings().await?;

        let mut slots = Vec::with_capacity(items.len());
        let mut missing = Vec::new();
        for item in items {
            match resolve_sku(&listings, &item.sku_id) {
                Some((product, sku)) => slots.push(ResolvedSlot {
                    slot_index: item.slot_index,
                    sku,
                    product,
                }),
                None => missing.push(item.sku_id),
            }
        }
        if !missing.is_empty() {
            tracing::warn!(
                config_id = %id,
                missing = missing.len(),
                "discovery set references unknown SKUs"
            );
        }

        Ok(DiscoverySetDetail {
            config,
            slots,
            missing,
        })
    }

    /// Suggested products for a set builder, in curated order.
    pub async fn recommendations(
        &self,
        config_id: Option<&DiscoverySetId>,
    ) -> Result<Vec<ProductListing>> {
        let scope = config_id.map_or("all", |id| id.as_str());
        let recs: Vec<DiscoveryRecommendation> = self
            .cache
            .get_or_try_insert_with(&cache_key!("discovery", "recs", scope), || {
                self.backend.list_recommendations(config_id)
            })
            .await?;
        let listings = self.listings().await?;

        Ok(recs
            .iter()
            .filter_map(|rec| listings.iter().find(|l| l.product.id == rec.product_id))
            .cloned()
            .collect())
    }

    /// Distinct brands in the catalog, alphabetically.
    pub async fn brands(&self) -> Result<Vec<String>> {
        Ok(unique_brands(&self.products().await?))
    }

    /// Brands grouped A-Z, narrowed to those matching `query`.
    pub async fn brand_index(&self, query: &str) -> Result<AlphabetIndex<String>> {
        let index = group_by_first_letter(self.brands().await?);
        Ok(index.filter(query))
    }

    pub async fn brand_images(&self) -> Result<Vec<BrandImage>> {
        self.cache
            .get_or_try_insert_with(&cache_key!("brands", "images"), || {
                self.backend.list_brand_images()
            })
            .await
    }

    /// Free-text catalog search.
    ///
    /// Non-blank queries are recorded for analytics. Recording is best
    /// effort: a failure is logged and the results are still returned.
    pub async fn search(&self, text: &str, page: i64) -> Result<SearchResults<ProductListing>> {
        let query = CatalogQuery::new()
            .with_text(text)
            .with_pagination(page, self.page_size);
        let results = self.catalog(&query).await?;

        if !text.trim().is_empty() {
            let event = SearchEvent::new(text, results.pagination.total);
            if let Err(e) = self.backend.record_search_event(&event).await {
                tracing::warn!(query = %event.query, error = %e, "failed to record search event");
            }
        }
        Ok(results)
    }

    /// "Add to cart" from a product card, using the default SKU.
    ///
    /// `Ok(None)` means the product has no SKUs and nothing was added.
    pub async fn add_product_to_cart(
        &self,
        cart: &mut Cart,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Option<AddAcknowledgement>> {
        let listing = self.product_detail(product_id).await?;
        Ok(cart.add_product(&listing.product, &listing.skus, quantity)?)
    }

    /// Add a specific size from the product page.
    pub async fn add_sku_to_cart(
        &self,
        cart: &mut Cart,
        sku_id: &SkuId,
        quantity: i64,
    ) -> Result<AddAcknowledgement> {
        let listings = self.listings().await?;
        let (product, sku) = resolve_sku(&listings, sku_id)
            .ok_or_else(|| CommerceError::SkuNotFound(sku_id.to_string()))?;
        let entry = CartEntry::for_sku(&product, &sku, quantity)?;
        Ok(cart.add_entry(entry)?)
    }

    pub async fn add_predefined_bundle(
        &self,
        cart: &mut Cart,
        config_id: &DiscoverySetId,
        quantity: i64,
    ) -> Result<AddAcknowledgement> {
        let detail = self.discovery_set_detail(config_id).await?;
        if detail.config.is_customizable {
            return Err(CommerceError::invalid(
                "config_id",
                format!("{} must be filled by the customer", detail.config.name),
            )
            .into());
        }
        if let Some(sku_id) = detail.missing.first() {
            return Err(CommerceError::SkuNotFound(sku_id.to_string()).into());
        }
        let entry = CartEntry::predefined_bundle(&detail.config, detail.slots, quantity)?;
        Ok(cart.add_entry(entry)?)
    }

    /// Add a set the customer filled, one SKU per slot in slot order.
    pub async fn add_custom_bundle(
        &self,
        cart: &mut Cart,
        config_id: &DiscoverySetId,
        sku_ids: &[SkuId],
        quantity: i64,
    ) -> Result<AddAcknowledgement> {
        let config = self.discovery_set(config_id).await?;
        let listings = self.listings().await?;

        let picks = sku_ids
            .iter()
            .map(|sku_id| {
                resolve_sku(&listings, sku_id)
                    .map(|(product, sku)| BundlePick { sku, product })
                    .ok_or_else(|| CommerceError::SkuNotFound(sku_id.to_string()))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let entry = CartEntry::custom_bundle(&config, picks, quantity)?;
        Ok(cart.add_entry(entry)?)
    }

    /// Subtotal, shipping and total for the cart.
    pub fn quote(&self, cart: &Cart) -> Result<CartQuote> {
        Ok(cart.quote(&self.shipping)?)
    }

    /// Validate the form, store the order and its items, then empty the cart.
    ///
    /// On any failure the cart is left as it was.
    pub async fn place_order(&self, cart: &mut Cart, form: CheckoutForm) -> Result<PlacedOrder> {
        let timer = OperationTimer::start("place_order");
        let draft = OrderDraft::from_cart(cart, form, &self.shipping)?;

        let order = self.backend.insert_order(&draft.order).await?;
        let items = self
            .backend
            .insert_order_items(&order.id, &draft.items)
            .await?;

        self.cache.invalidate_prefix("orders:");
        cart.clear();
        tracing::info!(
            order_id = %order.id,
            items = items.len(),
            total = %order.total().display(),
            "order placed"
        );
        timer.finish_with(items.len());

        Ok(PlacedOrder { order, items })
    }
}

/// Find a SKU and its product among the listings.
fn resolve_sku(listings: &[ProductListing], sku_id: &SkuId) -> Option<(Product, Sku)> {
    listings.iter().find_map(|listing| {
        listing
            .skus
            .iter()
            .find(|s| &s.id == sku_id)
            .map(|sku| (listing.product.clone(), sku.clone()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(id: &str, skus: &[(&str, i32)]) -> ProductListing {
        let product = Product::new(id, id.to_uppercase(), "Brand");
        let skus = skus
            .iter()
            .map(|(sku, ml)| Sku::new(*sku, id, *ml, 1000))
            .collect();
        ProductListing::new(product, skus)
    }

    #[test]
    fn test_resolve_sku() {
        let listings = vec![listing("p1", &[("a", 2), ("b", 5)]), listing("p2", &[("c", 2)])];
        let (product, sku) = resolve_sku(&listings, &SkuId::new("c")).unwrap();
        assert_eq!(product.id, ProductId::new("p2"));
        assert_eq!(sku.size_ml, 2);
        assert!(resolve_sku(&listings, &SkuId::new("zzz")).is_none());
    }

    #[test]
    fn test_detail_completeness() {
        let detail = DiscoverySetDetail {
            config: DiscoverySetConfig {
                id: DiscoverySetId::new("s"),
                name: "Set".into(),
                description: None,
                total_slots: 3,
                slot_volume_ml: 2,
                base_price_bani: 9900,
                is_active: true,
                is_customizable: false,
            },
            slots: Vec::new(),
            missing: vec![SkuId::new("gone")],
        };
        assert!(!detail.is_complete());
    }
}
