//! Purchase-time snapshots stored on order items.
//!
//! Catalog rows can change after an order is placed, so each order item
//! carries a denormalized copy of what was bought.

use crate::ids::{DiscoverySetId, ProductId, SkuId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;

/// What an order item or cart entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// A single SKU.
    Sku,
    /// A curated discovery set with fixed contents.
    PredefinedBundle,
    /// A discovery set filled by the customer.
    CustomBundle,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Sku => "sku",
            ItemType::PredefinedBundle => "predefined_bundle",
            ItemType::CustomBundle => "custom_bundle",
        }
    }

    pub fn is_bundle(&self) -> bool {
        !matches!(self, ItemType::Sku)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sku" => Ok(ItemType::Sku),
            "predefined_bundle" => Ok(ItemType::PredefinedBundle),
            "custom_bundle" => Ok(ItemType::CustomBundle),
            other => Err(CommerceError::InvalidSnapshot(format!(
                "unknown item type: {}",
                other
            ))),
        }
    }
}

/// One sample inside a bundle snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SlotSnapshot {
    pub slot_index: i32,
    pub sku_id: SkuId,
    pub product_id: ProductId,
    pub product_name: String,
    pub brand: String,
    pub size_ml: i32,
}

/// Denormalized copy of a purchased item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemSnapshot {
    Sku {
        product_id: ProductId,
        sku_id: SkuId,
        product_name: String,
        brand: String,
        #[serde(default)]
        image_url: Option<String>,
        size_ml: i32,
        #[serde(default)]
        label: Option<String>,
    },
    PredefinedBundle {
        config_id: DiscoverySetId,
        name: String,
        slot_volume_ml: i32,
        slots: Vec<SlotSnapshot>,
    },
    CustomBundle {
        config_id: DiscoverySetId,
        name: String,
        slot_volume_ml: i32,
        slots: Vec<SlotSnapshot>,
    },
}

impl ItemSnapshot {
    pub fn item_type(&self) -> ItemType {
        match self {
            ItemSnapshot::Sku { .. } => ItemType::Sku,
            ItemSnapshot::PredefinedBundle { .. } => ItemType::PredefinedBundle,
            ItemSnapshot::CustomBundle { .. } => ItemType::CustomBundle,
        }
    }

    /// Line title for order views ("Brand Name, 2 ml" or the set name).
    pub fn title(&self) -> String {
        match self {
            ItemSnapshot::Sku {
                product_name,
                brand,
                size_ml,
                ..
            } => format!("{} {}, {} ml", brand, product_name, size_ml),
            ItemSnapshot::PredefinedBundle { name, .. }
            | ItemSnapshot::CustomBundle { name, .. } => name.clone(),
        }
    }

    /// Bundle contents; empty for single SKUs.
    pub fn slots(&self) -> &[SlotSnapshot] {
        match self {
            ItemSnapshot::Sku { .. } => &[],
            ItemSnapshot::PredefinedBundle { slots, .. }
            | ItemSnapshot::CustomBundle { slots, .. } => slots,
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, CommerceError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_json(value: &serde_json::Value) -> Result<Self, CommerceError> {
        Ok(serde_json::from_value(value.clone())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_tagged() {
        let snap = ItemSnapshot::Sku {
            product_id: ProductId::new("p1"),
            sku_id: SkuId::new("s1"),
            product_name: "Aventus".to_string(),
            brand: "Creed".to_string(),
            image_url: None,
            size_ml: 2,
            label: None,
        };
        let json = snap.to_json().unwrap();
        assert_eq!(json["kind"], "sku");
        assert_eq!(json["product_name"], "Aventus");
        assert_eq!(ItemSnapshot::from_json(&json).unwrap(), snap);
        assert_eq!(snap.title(), "Creed Aventus, 2 ml");
    }

    #[test]
    fn test_item_type_strings() {
        assert_eq!(ItemType::CustomBundle.as_str(), "custom_bundle");
        assert_eq!("predefined_bundle".parse::<ItemType>().unwrap(), ItemType::PredefinedBundle);
        assert!("bundle".parse::<ItemType>().is_err());
        assert_eq!(serde_json::to_string(&ItemType::Sku).unwrap(), "\"sku\"");
    }

    #[test]
    fn test_unknown_snapshot_kind_is_error() {
        let value = serde_json::json!({"kind": "gift_card"});
        assert!(ItemSnapshot::from_json(&value).is_err());
    }
}
