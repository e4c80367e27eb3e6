//! SKU (size/price variant) types.

use crate::error::{into_validation, CommerceError, FieldError};
use crate::ids::{ProductId, SkuId};
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Sample size offered by default on product cards.
pub const PREFERRED_SAMPLE_ML: i32 = 2;

/// A purchasable size of a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Sku {
    /// Unique SKU identifier.
    pub id: SkuId,
    /// Product this SKU belongs to.
    pub product_id: ProductId,
    /// Bottle or decant size.
    pub size_ml: i32,
    /// Price in bani.
    pub price_bani: i64,
    /// Units in stock.
    #[serde(default)]
    pub stock: i32,
    /// Optional display label (e.g., "Decant 2 ml").
    #[serde(default)]
    pub label: Option<String>,
}

impl Sku {
    pub fn new(
        id: impl Into<SkuId>,
        product_id: impl Into<ProductId>,
        size_ml: i32,
        price_bani: i64,
    ) -> Self {
        Self {
            id: id.into(),
            product_id: product_id.into(),
            size_ml,
            price_bani,
            stock: 0,
            label: None,
        }
    }

    pub fn price(&self) -> Money {
        Money::new(self.price_bani)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Size as shown to customers: the label when set, otherwise "N ml".
    pub fn display_size(&self) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("{} ml", self.size_ml),
        }
    }
}

/// Pick the SKU that "add to cart" uses for a product card.
///
/// Prefers the 2 ml sample; otherwise the first SKU in the order the backend
/// returned them. `None` when the product has no SKUs.
pub fn select_default_sku(skus: &[Sku]) -> Option<&Sku> {
    skus.iter()
        .find(|s| s.size_ml == PREFERRED_SAMPLE_ML)
        .or_else(|| skus.first())
}

/// Admin form payload for a SKU.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SkuDraft {
    #[serde(default)]
    pub id: Option<SkuId>,
    pub product_id: ProductId,
    pub size_ml: i32,
    pub price_bani: i64,
    #[serde(default)]
    pub stock: i32,
    #[serde(default)]
    pub label: Option<String>,
}

impl SkuDraft {
    pub fn validate(self) -> Result<Sku, CommerceError> {
        let mut errors = Vec::new();
        if self.size_ml <= 0 {
            errors.push(FieldError::new("size_ml", "Size must be positive"));
        }
        if self.price_bani <= 0 {
            errors.push(FieldError::new("price_bani", "Price must be positive"));
        }
        if self.stock < 0 {
            errors.push(FieldError::new("stock", "Stock cannot be negative"));
        }
        into_validation(errors)?;

        Ok(Sku {
            id: self.id.unwrap_or_else(SkuId::generate),
            product_id: self.product_id,
            size_ml: self.size_ml,
            price_bani: self.price_bani,
            stock: self.stock,
            label: self
                .label
                .map(|l| l.trim().to_string())
                .filter(|l| !l.is_empty()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sku_prefers_sample_size() {
        let skus = vec![
            Sku::new("s50", "p1", 50, 45000),
            Sku::new("s2", "p1", 2, 2500),
        ];
        assert_eq!(select_default_sku(&skus).unwrap().id.as_str(), "s2");
    }

    #[test]
    fn test_default_sku_falls_back_to_first() {
        let skus = vec![
            Sku::new("s10", "p1", 10, 9000),
            Sku::new("s5", "p1", 5, 5000),
        ];
        assert_eq!(select_default_sku(&skus).unwrap().id.as_str(), "s10");
    }

    #[test]
    fn test_default_sku_empty() {
        assert!(select_default_sku(&[]).is_none());
    }

    #[test]
    fn test_display_size() {
        let mut sku = Sku::new("s2", "p1", 2, 2500);
        assert_eq!(sku.display_size(), "2 ml");
        sku.label = Some("Decant".to_string());
        assert_eq!(sku.display_size(), "Decant");
    }

    #[test]
    fn test_sku_draft_validation() {
        let draft = SkuDraft {
            id: None,
            product_id: ProductId::new("p1"),
            size_ml: 0,
            price_bani: -1,
            stock: 3,
            label: None,
        };
        let err = draft.validate().unwrap_err();
        assert_eq!(err.field_errors().len(), 2);
    }
}
