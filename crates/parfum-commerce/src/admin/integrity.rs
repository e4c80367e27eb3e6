//! Order integrity check.
//!
//! Compares the subtotal stored on an order with the sum of its line totals.
//! Mismatches are reported, never corrected.

use crate::checkout::{Order, OrderItem};
use crate::money::{format_price, Money};
use serde::{Deserialize, Serialize};

/// Largest subtotal difference, in bani, treated as rounding noise.
pub const INTEGRITY_TOLERANCE_BANI: i64 = 1;

/// Result of comparing an order against its items.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct IntegrityReport {
    pub stored_subtotal: Money,
    pub computed_subtotal: Money,
    /// stored - computed.
    pub difference: Money,
    /// |difference| > tolerance.
    pub subtotal_mismatch: bool,
    /// total != subtotal + shipping.
    pub totals_mismatch: bool,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        !self.subtotal_mismatch && !self.totals_mismatch
    }

    /// Banner lines for the order detail page.
    pub fn warnings(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.subtotal_mismatch {
            lines.push(format!(
                "Subtotalul salvat ({}) nu corespunde sumei produselor ({}), diferență {}",
                self.stored_subtotal.display(),
                self.computed_subtotal.display(),
                self.difference.display(),
            ));
        }
        if self.totals_mismatch {
            lines.push("Totalul nu este egal cu subtotal + transport".to_string());
        }
        lines
    }
}

/// Check an order against its line items.
///
/// Sums saturate instead of failing so a corrupt row still yields a report.
pub fn check_order_integrity(order: &Order, items: &[OrderItem]) -> IntegrityReport {
    let computed = items
        .iter()
        .fold(0i64, |acc, item| acc.saturating_add(item.line_total_bani));
    let difference = order.subtotal_bani.saturating_sub(computed);

    IntegrityReport {
        stored_subtotal: order.subtotal(),
        computed_subtotal: Money::new(computed),
        difference: Money::new(difference),
        subtotal_mismatch: difference.saturating_abs() > INTEGRITY_TOLERANCE_BANI,
        totals_mismatch: !order.totals_consistent(),
    }
}

/// One-line summary, used in logs and the CLI.
pub fn describe(report: &IntegrityReport) -> String {
    if report.is_clean() {
        "ok".to_string()
    } else {
        format!(
            "stored {} vs items {}",
            format_price(report.stored_subtotal.amount_bani),
            format_price(report.computed_subtotal.amount_bani)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemType;
    use crate::checkout::{OrderStatus, ShippingAddress};
    use crate::ids::{OrderId, OrderItemId};
    use chrono::Utc;

    fn order(subtotal: i64) -> Order {
        Order {
            id: OrderId::new("o1"),
            customer_name: "Ion".to_string(),
            customer_email: "ion@example.ro".to_string(),
            customer_phone: "0733000111".to_string(),
            shipping_address: ShippingAddress::default(),
            status: OrderStatus::Placed,
            subtotal_bani: subtotal,
            shipping_bani: 0,
            total_bani: subtotal,
            created_at: Utc::now(),
            notes: None,
        }
    }

    fn item(line_total: i64) -> OrderItem {
        OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::new("o1"),
            item_type: ItemType::Sku,
            sku_id: None,
            config_id: None,
            quantity: 1,
            unit_price_bani: line_total,
            line_total_bani: line_total,
            snapshot: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_matching_order_is_clean() {
        let report = check_order_integrity(&order(7000), &[item(4000), item(3000)]);
        assert!(report.is_clean());
        assert!(report.warnings().is_empty());
        assert_eq!(describe(&report), "ok");
    }

    #[test]
    fn test_one_ban_is_tolerated() {
        let report = check_order_integrity(&order(7001), &[item(4000), item(3000)]);
        assert!(!report.subtotal_mismatch);
        assert_eq!(report.difference.amount_bani, 1);
    }

    #[test]
    fn test_two_bani_flags() {
        let report = check_order_integrity(&order(6998), &[item(4000), item(3000)]);
        assert!(report.subtotal_mismatch);
        assert_eq!(report.difference.amount_bani, -2);
        assert_eq!(report.warnings().len(), 1);
    }

    #[test]
    fn test_totals_mismatch_is_separate() {
        let mut o = order(7000);
        o.total_bani = 9000;
        let report = check_order_integrity(&o, &[item(7000)]);
        assert!(!report.subtotal_mismatch);
        assert!(report.totals_mismatch);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_order_without_items() {
        let report = check_order_integrity(&order(5000), &[]);
        assert!(report.subtotal_mismatch);
        assert!(report.computed_subtotal.is_zero());
    }
}
