//! Cart entries and their price/snapshot computation.

use crate::cart::{ItemSnapshot, ItemType, SlotSnapshot, MAX_QUANTITY_PER_ITEM};
use crate::catalog::{DiscoverySetConfig, Product, Sku};
use crate::error::{CommerceError, FieldError};
use crate::ids::{CartEntryId, DiscoverySetId, ProductId, SkuId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// A predefined set slot with its SKU and product already fetched.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSlot {
    pub slot_index: i32,
    pub sku: Sku,
    pub product: Product,
}

/// A customer's choice for one slot of a custom set.
#[derive(Debug, Clone, PartialEq)]
pub struct BundlePick {
    pub sku: Sku,
    pub product: Product,
}

/// An item in the cart. Nothing is persisted until checkout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartEntry {
    pub id: CartEntryId,
    pub item_type: ItemType,
    #[serde(default)]
    pub sku_id: Option<SkuId>,
    #[serde(default)]
    pub config_id: Option<DiscoverySetId>,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Product or set name.
    pub name: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    /// "2 ml" or "5 x 2 ml".
    pub size_label: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// SKU volume; zero for bundles.
    #[serde(default)]
    pub size_ml: i32,
    /// Bundle contents, for the snapshot.
    #[serde(default)]
    pub slots: Vec<SlotSnapshot>,
    /// SKU label at the time it was added.
    #[serde(default)]
    pub label: Option<String>,
}

impl CartEntry {
    /// Entry for a single SKU of a product.
    pub fn for_sku(product: &Product, sku: &Sku, quantity: i64) -> Result<Self, CommerceError> {
        check_quantity(quantity)?;
        if sku.product_id != product.id {
            return Err(CommerceError::invalid(
                "sku_id",
                format!("SKU {} does not belong to product {}", sku.id, product.id),
            ));
        }

        Ok(Self {
            id: CartEntryId::generate(),
            item_type: ItemType::Sku,
            sku_id: Some(sku.id.clone()),
            config_id: None,
            product_id: Some(product.id.clone()),
            name: product.name.clone(),
            brand: Some(product.brand.clone()),
            image_url: product.image_url.clone(),
            size_label: sku.display_size(),
            quantity,
            unit_price: sku.price(),
            size_ml: sku.size_ml,
            slots: Vec::new(),
            label: sku.label.clone(),
        })
    }

    /// Entry for a curated set. Slots are ordered by slot index.
    pub fn predefined_bundle(
        config: &DiscoverySetConfig,
        mut slots: Vec<ResolvedSlot>,
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        check_quantity(quantity)?;
        if !config.is_purchasable() {
            return Err(CommerceError::DiscoverySetUnavailable(config.id.to_string()));
        }
        slots.sort_by_key(|s| s.slot_index);

        let image_url = slots.iter().find_map(|s| s.product.image_url.clone());
        let slots = slots
            .into_iter()
            .map(|s| slot_snapshot(s.slot_index, &s.sku, &s.product))
            .collect();

        Ok(Self::bundle(config, ItemType::PredefinedBundle, slots, image_url, quantity))
    }

    /// Entry for a set the customer filled. Picks are numbered from slot 1.
    pub fn custom_bundle(
        config: &DiscoverySetConfig,
        picks: Vec<BundlePick>,
        quantity: i64,
    ) -> Result<Self, CommerceError> {
        check_quantity(quantity)?;
        if !config.is_purchasable() || !config.is_customizable {
            return Err(CommerceError::DiscoverySetUnavailable(config.id.to_string()));
        }

        let mut errors = Vec::new();
        if picks.len() != config.total_slots.max(0) as usize {
            errors.push(FieldError::new(
                "slots",
                format!(
                    "{} requires exactly {} samples, got {}",
                    config.name,
                    config.total_slots,
                    picks.len()
                ),
            ));
        }
        for (i, pick) in picks.iter().enumerate() {
            if pick.sku.size_ml != config.slot_volume_ml {
                errors.push(FieldError::new(
                    format!("slots[{}]", i),
                    format!(
                        "{} is {} ml, set samples are {} ml",
                        pick.product.name, pick.sku.size_ml, config.slot_volume_ml
                    ),
                ));
            }
            if pick.sku.product_id != pick.product.id {
                errors.push(FieldError::new(
                    format!("slots[{}]", i),
                    "SKU does not belong to product",
                ));
            }
        }
        if !errors.is_empty() {
            return Err(CommerceError::Validation(errors));
        }

        let image_url = picks.iter().find_map(|p| p.product.image_url.clone());
        let slots = picks
            .iter()
            .enumerate()
            .map(|(i, p)| slot_snapshot(i as i32 + 1, &p.sku, &p.product))
            .collect();

        Ok(Self::bundle(config, ItemType::CustomBundle, slots, image_url, quantity))
    }

    fn bundle(
        config: &DiscoverySetConfig,
        item_type: ItemType,
        slots: Vec<SlotSnapshot>,
        image_url: Option<String>,
        quantity: i64,
    ) -> Self {
        Self {
            id: CartEntryId::generate(),
            item_type,
            sku_id: None,
            config_id: Some(config.id.clone()),
            product_id: None,
            name: config.name.clone(),
            brand: None,
            image_url,
            size_label: config.size_label(),
            quantity,
            unit_price: config.base_price(),
            size_ml: config.slot_volume_ml,
            slots,
            label: None,
        }
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Result<Money, CommerceError> {
        self.unit_price.try_multiply(self.quantity)
    }

    /// Whether `other` is the same purchasable thing and should be merged.
    pub fn same_item(&self, other: &CartEntry) -> bool {
        if self.item_type != other.item_type {
            return false;
        }
        match self.item_type {
            ItemType::Sku => self.sku_id.is_some() && self.sku_id == other.sku_id,
            ItemType::PredefinedBundle => {
                self.config_id.is_some() && self.config_id == other.config_id
            }
            ItemType::CustomBundle => {
                self.config_id == other.config_id
                    && self.slots.len() == other.slots.len()
                    && self
                        .slots
                        .iter()
                        .zip(other.slots.iter())
                        .all(|(a, b)| a.sku_id == b.sku_id)
            }
        }
    }

    /// Build the purchase-time snapshot for this entry.
    pub fn snapshot(&self) -> Result<ItemSnapshot, CommerceError> {
        match self.item_type {
            ItemType::Sku => {
                let (product_id, sku_id) = match (&self.product_id, &self.sku_id) {
                    (Some(p), Some(s)) => (p.clone(), s.clone()),
                    _ => {
                        return Err(CommerceError::InvalidSnapshot(format!(
                            "cart entry {} has no SKU reference",
                            self.id
                        )))
                    }
                };
                Ok(ItemSnapshot::Sku {
                    product_id,
                    sku_id,
                    product_name: self.name.clone(),
                    brand: self.brand.clone().unwrap_or_default(),
                    image_url: self.image_url.clone(),
                    size_ml: self.size_ml,
                    label: self.label.clone(),
                })
            }
            ItemType::PredefinedBundle | ItemType::CustomBundle => {
                let config_id = self.config_id.clone().ok_or_else(|| {
                    CommerceError::InvalidSnapshot(format!(
                        "cart entry {} has no discovery set reference",
                        self.id
                    ))
                })?;
                let name = self.name.clone();
                let slot_volume_ml = self.size_ml;
                let slots = self.slots.clone();
                Ok(if self.item_type == ItemType::PredefinedBundle {
                    ItemSnapshot::PredefinedBundle {
                        config_id,
                        name,
                        slot_volume_ml,
                        slots,
                    }
                } else {
                    ItemSnapshot::CustomBundle {
                        config_id,
                        name,
                        slot_volume_ml,
                        slots,
                    }
                })
            }
        }
    }
}

fn check_quantity(quantity: i64) -> Result<(), CommerceError> {
    if quantity <= 0 {
        return Err(CommerceError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY_PER_ITEM {
        return Err(CommerceError::QuantityExceedsLimit(
            quantity,
            MAX_QUANTITY_PER_ITEM,
        ));
    }
    Ok(())
}

fn slot_snapshot(slot_index: i32, sku: &Sku, product: &Product) -> SlotSnapshot {
    SlotSnapshot {
        slot_index,
        sku_id: sku.id.clone(),
        product_id: product.id.clone(),
        product_name: product.name.clone(),
        brand: product.brand.clone(),
        size_ml: sku.size_ml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, name: &str) -> Product {
        Product::new(id, name, "Maison")
    }

    fn config(customizable: bool) -> DiscoverySetConfig {
        DiscoverySetConfig {
            id: DiscoverySetId::new("set-1"),
            name: "Trio".to_string(),
            description: None,
            total_slots: 3,
            slot_volume_ml: 2,
            base_price_bani: 9000,
            is_active: true,
            is_customizable: customizable,
        }
    }

    fn pick(n: u32) -> BundlePick {
        let pid = format!("p{}", n);
        BundlePick {
            sku: Sku::new(format!("s{}", n), pid.as_str(), 2, 2000),
            product: product(&pid, &format!("Scent {}", n)),
        }
    }

    #[test]
    fn test_sku_entry_line_total() {
        let p = product("p1", "Oud");
        let sku = Sku::new("s1", "p1", 10, 12050);
        let entry = CartEntry::for_sku(&p, &sku, 3).unwrap();
        assert_eq!(entry.unit_price.amount_bani, 12050);
        assert_eq!(entry.line_total().unwrap().amount_bani, 36150);
        assert_eq!(entry.size_label, "10 ml");
    }

    #[test]
    fn test_sku_entry_rejects_foreign_sku() {
        let p = product("p1", "Oud");
        let sku = Sku::new("s1", "p2", 10, 12050);
        assert!(CartEntry::for_sku(&p, &sku, 1).is_err());
    }

    #[test]
    fn test_invalid_quantity() {
        let p = product("p1", "Oud");
        let sku = Sku::new("s1", "p1", 10, 12050);
        assert_eq!(
            CartEntry::for_sku(&p, &sku, 0),
            Err(CommerceError::InvalidQuantity(0))
        );
    }

    #[test]
    fn test_predefined_bundle_orders_slots() {
        let slots = vec![
            ResolvedSlot {
                slot_index: 2,
                sku: Sku::new("s2", "p2", 2, 2000),
                product: product("p2", "Second"),
            },
            ResolvedSlot {
                slot_index: 1,
                sku: Sku::new("s1", "p1", 2, 2000),
                product: product("p1", "First"),
            },
        ];
        let entry = CartEntry::predefined_bundle(&config(false), slots, 1).unwrap();
        assert_eq!(entry.unit_price.amount_bani, 9000);
        assert_eq!(entry.slots[0].product_name, "First");
        assert_eq!(entry.size_label, "3 x 2 ml");

        match entry.snapshot().unwrap() {
            ItemSnapshot::PredefinedBundle { slots, .. } => assert_eq!(slots.len(), 2),
            other => panic!("unexpected snapshot {:?}", other),
        }
    }

    #[test]
    fn test_inactive_set_rejected() {
        let mut c = config(false);
        c.is_active = false;
        assert!(matches!(
            CartEntry::predefined_bundle(&c, vec![], 1),
            Err(CommerceError::DiscoverySetUnavailable(_))
        ));
    }

    #[test]
    fn test_custom_bundle_requires_all_slots() {
        let err = CartEntry::custom_bundle(&config(true), vec![pick(1), pick(2)], 1).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "slots");
    }

    #[test]
    fn test_custom_bundle_requires_slot_volume() {
        let mut picks = vec![pick(1), pick(2), pick(3)];
        picks[1].sku.size_ml = 5;
        let err = CartEntry::custom_bundle(&config(true), picks, 1).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "slots[1]");
    }

    #[test]
    fn test_custom_bundle_needs_customizable_set() {
        let picks = vec![pick(1), pick(2), pick(3)];
        assert!(CartEntry::custom_bundle(&config(false), picks, 1).is_err());
    }

    #[test]
    fn test_custom_bundle_snapshot() {
        let entry =
            CartEntry::custom_bundle(&config(true), vec![pick(1), pick(2), pick(3)], 2).unwrap();
        assert_eq!(entry.line_total().unwrap().amount_bani, 18000);
        let snap = entry.snapshot().unwrap();
        assert_eq!(snap.item_type(), ItemType::CustomBundle);
        assert_eq!(snap.slots()[2].slot_index, 3);
    }

    #[test]
    fn test_same_item() {
        let set = config(true);
        let a = CartEntry::custom_bundle(&set, vec![pick(1), pick(2), pick(3)], 1).unwrap();
        let b = CartEntry::custom_bundle(&set, vec![pick(1), pick(2), pick(3)], 1).unwrap();
        let c = CartEntry::custom_bundle(&set, vec![pick(3), pick(2), pick(1)], 1).unwrap();
        assert!(a.same_item(&b));
        assert!(!a.same_item(&c));
    }
}
