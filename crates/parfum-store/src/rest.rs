//! Backend over the hosted REST API.
//!
//! Tables are served PostgREST-style under `/rest/v1/<table>`, objects under
//! `/storage/v1/object/<bucket>/<path>` and the session under
//! `/auth/v1/user`. Every request carries the project `apikey`; the bearer
//! token is the signed-in user's when there is one, else the anon key.

use std::fmt::Display;
use std::time::Duration;

use async_trait::async_trait;
use chrono::SecondsFormat;
use parfum_commerce::prelude::*;
use parfum_data::{ClientRequestBuilder, FetchClient};
use serde::Serialize;
use serde_json::json;

use crate::backend::{Backend, Result};
use crate::error::StoreError;
use crate::models::{AuthUser, BrandImage, SearchEvent};

const PREFER_REPRESENTATION: &str = "return=representation";
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=representation";

/// Order item row as inserted: the item plus its order id.
#[derive(Serialize)]
struct OrderItemRow<'a> {
    order_id: &'a OrderId,
    #[serde(flatten)]
    item: &'a NewOrderItem,
}

#[derive(Debug, Clone)]
pub struct RestBackend {
    client: FetchClient,
    anon_key: String,
    access_token: Option<String>,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        let anon_key = anon_key.into();
        let client = FetchClient::new()
            .with_base_url(base_url)
            .with_default_header("apikey", anon_key.clone());
        Self {
            client,
            anon_key,
            access_token: None,
        }
    }

    /// Act as a signed-in user (needed for admin writes).
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }

    /// Public URL of a stored object.
    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        self.client
            .resolve(&format!("/storage/v1/object/public/{}/{}", bucket, path))
    }

    fn authorized(&self, request: ClientRequestBuilder) -> ClientRequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request.bearer_auth(token)
    }

    fn select(&self, table: &str) -> ClientRequestBuilder {
        self.authorized(self.client.get(table_path(table)))
            .query("select", "*")
    }

    fn insert(&self, table: &str) -> ClientRequestBuilder {
        self.authorized(self.client.post(table_path(table)))
            .header("Prefer", PREFER_REPRESENTATION)
    }

    fn upsert(&self, table: &str, on_conflict: &str) -> ClientRequestBuilder {
        self.authorized(self.client.post(table_path(table)))
            .query("on_conflict", on_conflict)
            .header("Prefer", PREFER_MERGE)
    }

    fn update(&self, table: &str) -> ClientRequestBuilder {
        self.authorized(self.client.patch(table_path(table)))
            .header("Prefer", PREFER_REPRESENTATION)
    }

    fn orders_request(&self, filter: &OrderFilter) -> ClientRequestBuilder {
        let mut request = self.select("orders").query("order", "created_at.desc");
        if let Some(status) = filter.status {
            request = request.query("status", eq(status.as_str()));
        }
        if let Some(from) = filter.created_from {
            request = request.query(
                "created_at",
                format!("gte.{}", from.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        if let Some(to) = filter.created_to {
            request = request.query(
                "created_at",
                format!("lt.{}", to.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        request
    }

    fn recommendations_request(&self, config_id: Option<&DiscoverySetId>) -> ClientRequestBuilder {
        let request = self
            .select("discovery_recommendations")
            .query("order", "position.asc");
        match config_id {
            Some(id) => request.query("or", format!("(config_id.eq.{},config_id.is.null)", id)),
            None => request,
        }
    }
}

fn table_path(table: &str) -> String {
    format!("/rest/v1/{}", table)
}

fn eq(value: impl Display) -> String {
    format!("eq.{}", value)
}

/// `in.("a","b")` filter value.
fn in_list<T: Display>(values: &[T]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| format!("\"{}\"", v)).collect();
    format!("in.({})", quoted.join(","))
}

/// First row of a representation response.
fn first_row<T>(rows: Vec<T>, what: &str) -> Result<T> {
    rows.into_iter()
        .next()
        .ok_or_else(|| StoreError::Malformed(format!("{} returned no rows", what)))
}

#[async_trait]
impl Backend for RestBackend {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self
            .select("products")
            .query("order", "name.asc")
            .fetch_json()
            .await?)
    }

    async fn get_product(&self, id: &ProductId) -> Result<Option<Product>> {
        let rows: Vec<Product> = self
            .select("products")
            .query("id", eq(id))
            .query("limit", "1")
            .fetch_json()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn upsert_product(&self, product: &Product) -> Result<Product> {
        let rows = self
            .upsert("products", "id")
            .json(product)?
            .fetch_json()
            .await?;
        first_row(rows, "product upsert")
    }

    async fn list_skus(&self) -> Result<Vec<Sku>> {
        Ok(self
            .select("skus")
            .query("order", "size_ml.asc")
            .fetch_json()
            .await?)
    }

    async fn list_skus_for_products(&self, product_ids: &[ProductId]) -> Result<Vec<Sku>> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .select("skus")
            .query("product_id", in_list(product_ids))
            .query("order", "size_ml.asc")
            .fetch_json()
            .await?)
    }

    async fn get_skus(&self, ids: &[SkuId]) -> Result<Vec<Sku>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self
            .select("skus")
            .query("id", in_list(ids))
            .fetch_json()
            .await?)
    }

    async fn upsert_sku(&self, sku: &Sku) -> Result<Sku> {
        let rows = self.upsert("skus", "id").json(sku)?.fetch_json().await?;
        first_row(rows, "SKU upsert")
    }

    async fn list_discovery_sets(&self, active_only: bool) -> Result<Vec<DiscoverySetConfig>> {
        let mut request = self
            .select("discovery_set_configs")
            .query("order", "total_slots.asc");
        if active_only {
            request = request.query("is_active", "eq.true");
        }
        Ok(request.fetch_json().await?)
    }

    async fn get_discovery_set(&self, id: &DiscoverySetId) -> Result<Option<DiscoverySetConfig>> {
        let rows: Vec<DiscoverySetConfig> = self
            .select("discovery_set_configs")
            .query("id", eq(id))
            .query("limit", "1")
            .fetch_json()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_discovery_set_items(
        &self,
        config_id: &DiscoverySetId,
    ) -> Result<Vec<DiscoverySetItem>> {
        Ok(self
            .select("discovery_set_config_items")
            .query("config_id", eq(config_id))
            .query("order", "slot_index.asc")
            .fetch_json()
            .await?)
    }

    async fn list_recommendations(
        &self,
        config_id: Option<&DiscoverySetId>,
    ) -> Result<Vec<DiscoveryRecommendation>> {
        Ok(self.recommendations_request(config_id).fetch_json().await?)
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<Order> {
        let rows = self.insert("orders").json(order)?.fetch_json().await?;
        first_row(rows, "order insert")
    }

    async fn insert_order_items(
        &self,
        order_id: &OrderId,
        items: &[NewOrderItem],
    ) -> Result<Vec<OrderItem>> {
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<OrderItemRow<'_>> = items
            .iter()
            .map(|item| OrderItemRow { order_id, item })
            .collect();
        Ok(self
            .insert("order_items")
            .json(&rows)?
            .fetch_json()
            .await?)
    }

    async fn list_orders(&self, filter: &OrderFilter) -> Result<Vec<Order>> {
        Ok(self.orders_request(filter).fetch_json().await?)
    }

    async fn get_order(&self, id: &OrderId) -> Result<Option<Order>> {
        let rows: Vec<Order> = self
            .select("orders")
            .query("id", eq(id))
            .query("limit", "1")
            .fetch_json()
            .await?;
        Ok(rows.into_iter().next())
    }

    async fn list_order_items(&self, order_id: &OrderId) -> Result<Vec<OrderItem>> {
        Ok(self
            .select("order_items")
            .query("order_id", eq(order_id))
            .fetch_json()
            .await?)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatus) -> Result<Order> {
        let rows: Vec<Order> = self
            .update("orders")
            .query("id", eq(id))
            .json(&json!({ "status": status }))?
            .fetch_json()
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("Order", id))
    }

    async fn update_order_shipping(
        &self,
        id: &OrderId,
        shipping_bani: i64,
        total_bani: i64,
    ) -> Result<Order> {
        let rows: Vec<Order> = self
            .update("orders")
            .query("id", eq(id))
            .json(&json!({ "shipping_bani": shipping_bani, "total_bani": total_bani }))?
            .fetch_json()
            .await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| StoreError::not_found("Order", id))
    }

    async fn record_search_event(&self, event: &SearchEvent) -> Result<()> {
        self.authorized(self.client.post(table_path("search_events")))
            .header("Prefer", "return=minimal")
            .json(event)?
            .execute()
            .await?;
        Ok(())
    }

    async fn list_brand_images(&self) -> Result<Vec<BrandImage>> {
        Ok(self
            .select("brand_images")
            .query("order", "brand.asc")
            .fetch_json()
            .await?)
    }

    async fn save_brand_image(&self, image: &BrandImage) -> Result<BrandImage> {
        let rows = self
            .upsert("brand_images", "brand")
            .json(image)?
            .fetch_json()
            .await?;
        first_row(rows, "brand image upsert")
    }

    async fn upload_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String> {
        self.authorized(
            self.client
                .post(format!("/storage/v1/object/{}/{}", bucket, path)),
        )
        .header("x-upsert", "true")
        .content_type(content_type)
        .body(bytes)
        .execute()
        .await?;
        Ok(self.public_url(bucket, path))
    }

    async fn current_user(&self, access_token: &str) -> Result<Option<AuthUser>> {
        let response = self
            .client
            .get("/auth/v1/user")
            .bearer_auth(access_token)
            .send()
            .await?;
        if matches!(response.status, 401 | 403) {
            return Ok(None);
        }
        Ok(Some(response.error_for_status()?.json()?))
    }

    async fn is_admin(&self, user_id: &UserId) -> Result<bool> {
        let rows: Vec<serde_json::Value> = self
            .authorized(self.client.get(table_path("admin_users")))
            .query("select", "user_id")
            .query("user_id", eq(user_id))
            .query("limit", "1")
            .fetch_json()
            .await?;
        Ok(!rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn backend() -> RestBackend {
        RestBackend::new("https://shop.example.co/", "anon-key")
    }

    fn query(request: &ClientRequestBuilder) -> Vec<(String, String)> {
        request.request().query_pairs().to_vec()
    }

    #[test]
    fn test_select_headers() {
        let request = backend().select("products");
        let built = request.request();
        assert_eq!(built.url(), "https://shop.example.co/rest/v1/products");
        assert_eq!(built.header_value("apikey"), Some("anon-key"));
        assert_eq!(built.header_value("authorization"), Some("Bearer anon-key"));
        assert_eq!(query(&request), vec![("select".to_string(), "*".to_string())]);
    }

    #[test]
    fn test_access_token_replaces_anon_bearer() {
        let request = backend().with_access_token("user-jwt").update("orders");
        let built = request.request();
        assert_eq!(built.header_value("Authorization"), Some("Bearer user-jwt"));
        assert_eq!(built.header_value("apikey"), Some("anon-key"));
        assert_eq!(built.header_value("prefer"), Some(PREFER_REPRESENTATION));
    }

    #[test]
    fn test_orders_filter_params() {
        let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap();
        let filter = OrderFilter::new()
            .with_status(OrderStatus::Shipped)
            .created_between(Some(from), Some(to));
        let pairs = query(&backend().orders_request(&filter));
        assert!(pairs.contains(&("order".into(), "created_at.desc".into())));
        assert!(pairs.contains(&("status".into(), "eq.shipped".into())));
        assert!(pairs.contains(&("created_at".into(), "gte.2024-03-01T00:00:00Z".into())));
        assert!(pairs.contains(&("created_at".into(), "lt.2024-04-01T00:00:00Z".into())));
    }

    #[test]
    fn test_recommendations_include_global_rows() {
        let id = DiscoverySetId::new("set-5");
        let pairs = query(&backend().recommendations_request(Some(&id)));
        assert!(pairs.contains(&("or".into(), "(config_id.eq.set-5,config_id.is.null)".into())));
        let pairs = query(&backend().recommendations_request(None));
        assert!(!pairs.iter().any(|(k, _)| k == "or"));
    }

    #[test]
    fn test_upsert_params() {
        let request = backend().upsert("brand_images", "brand");
        assert_eq!(request.request().header_value("Prefer"), Some(PREFER_MERGE));
        assert!(query(&request).contains(&("on_conflict".into(), "brand".into())));
    }

    #[test]
    fn test_filter_values() {
        assert_eq!(eq("abc"), "eq.abc");
        let ids = [SkuId::new("a"), SkuId::new("b")];
        assert_eq!(in_list(&ids), r#"in.("a","b")"#);
    }

    #[test]
    fn test_public_url() {
        assert_eq!(
            backend().public_url("brand-images", "hermes.png"),
            "https://shop.example.co/storage/v1/object/public/brand-images/hermes.png"
        );
    }

    #[test]
    fn test_order_item_row_flattens() {
        let item = NewOrderItem {
            item_type: ItemType::Sku,
            sku_id: Some(SkuId::new("s1")),
            config_id: None,
            quantity: 2,
            unit_price_bani: 5000,
            line_total_bani: 10000,
            snapshot: json!({ "kind": "sku" }),
        };
        let order_id = OrderId::new("o1");
        let row = serde_json::to_value(OrderItemRow {
            order_id: &order_id,
            item: &item,
        })
        .unwrap();
        assert_eq!(row["order_id"], "o1");
        assert_eq!(row["line_total_bani"], 10000);
        assert_eq!(row["item_type"], "sku");
    }
}
