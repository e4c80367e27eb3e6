//! Discovery set (sample bundle) types.

use crate::ids::{DiscoverySetId, DiscoverySetItemId, ProductId, RecommendationId, SkuId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Configuration of a discovery set.
///
/// Predefined sets list their contents as [`DiscoverySetItem`] rows;
/// customizable sets let the customer fill every slot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoverySetConfig {
    pub id: DiscoverySetId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Number of samples in the set.
    pub total_slots: i32,
    /// Volume of each sample.
    pub slot_volume_ml: i32,
    /// Price of the whole set in bani.
    pub base_price_bani: i64,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_customizable: bool,
}

impl DiscoverySetConfig {
    pub fn base_price(&self) -> Money {
        Money::new(self.base_price_bani)
    }

    /// "5 x 2 ml".
    pub fn size_label(&self) -> String {
        format!("{} x {} ml", self.total_slots, self.slot_volume_ml)
    }

    pub fn is_purchasable(&self) -> bool {
        self.is_active
    }
}

/// A fixed slot of a predefined discovery set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoverySetItem {
    pub id: DiscoverySetItemId,
    pub config_id: DiscoverySetId,
    pub slot_index: i32,
    pub sku_id: SkuId,
}

/// A curated product suggestion shown in the discovery set builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscoveryRecommendation {
    pub id: RecommendationId,
    /// Set the suggestion applies to; `None` applies to every set.
    #[serde(default)]
    pub config_id: Option<DiscoverySetId>,
    pub product_id: ProductId,
    #[serde(default)]
    pub position: i32,
}
