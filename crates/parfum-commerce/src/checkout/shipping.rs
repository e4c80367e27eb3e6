//! Shipping cost policy.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Default courier fee, in bani.
pub const DEFAULT_SHIPPING_FEE_BANI: i64 = 1500;

/// Default subtotal from which shipping is free, in bani.
pub const DEFAULT_FREE_SHIPPING_BANI: i64 = 20000;

/// Flat-rate shipping with an optional free-shipping threshold.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShippingPolicy {
    pub flat_fee_bani: i64,
    #[serde(default)]
    pub free_threshold_bani: Option<i64>,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            flat_fee_bani: DEFAULT_SHIPPING_FEE_BANI,
            free_threshold_bani: Some(DEFAULT_FREE_SHIPPING_BANI),
        }
    }
}

impl ShippingPolicy {
    /// Shipping cost for a cart with this subtotal.
    pub fn shipping_for(&self, subtotal: Money, cart_is_empty: bool) -> Money {
        if cart_is_empty {
            return Money::zero();
        }
        match self.free_threshold_bani {
            Some(threshold) if subtotal.amount_bani >= threshold => Money::zero(),
            _ => Money::new(self.flat_fee_bani),
        }
    }

    /// How much more the customer needs to spend for free shipping.
    pub fn remaining_for_free(&self, subtotal: Money) -> Option<Money> {
        let threshold = self.free_threshold_bani?;
        let remaining = threshold - subtotal.amount_bani;
        (remaining > 0).then(|| Money::new(remaining))
    }
}
