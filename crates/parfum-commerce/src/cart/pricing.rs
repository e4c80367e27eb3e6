//! Cart pricing breakdown.

use crate::ids::CartEntryId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Priced view of a cart, as shown on the cart and checkout pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartQuote {
    /// Per-entry pricing, in cart order.
    pub lines: Vec<QuoteLine>,
    /// Sum of line totals.
    pub subtotal: Money,
    /// Shipping cost for this subtotal.
    pub shipping: Money,
    /// subtotal + shipping.
    pub total: Money,
}

impl CartQuote {
    pub fn has_free_shipping(&self) -> bool {
        !self.lines.is_empty() && self.shipping.is_zero()
    }
}

/// Pricing for a single cart entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteLine {
    pub entry_id: CartEntryId,
    pub name: String,
    pub size_label: String,
    pub quantity: i64,
    pub unit_price: Money,
    /// unit_price * quantity.
    pub line_total: Money,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_shipping_needs_lines() {
        let empty = CartQuote {
            lines: vec![],
            subtotal: Money::zero(),
            shipping: Money::zero(),
            total: Money::zero(),
        };
        assert!(!empty.has_free_shipping());

        let quote = CartQuote {
            lines: vec![QuoteLine {
                entry_id: CartEntryId::new("e1"),
                name: "Set".to_string(),
                size_label: "5 x 2 ml".to_string(),
                quantity: 1,
                unit_price: Money::new(25000),
                line_total: Money::new(25000),
            }],
            subtotal: Money::new(25000),
            shipping: Money::zero(),
            total: Money::new(25000),
        };
        assert!(quote.has_free_shipping());
    }
}
