//! Order types.

use crate::cart::{ItemSnapshot, ItemType};
use crate::checkout::ShippingAddress;
use crate::error::CommerceError;
use crate::ids::{DiscoverySetId, OrderId, OrderItemId, SkuId};
use crate::money::Money;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created but not submitted.
    Draft,
    /// Submitted by the customer.
    #[default]
    Placed,
    /// Payment received.
    Paid,
    /// Handed to the courier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before shipping.
    Canceled,
    /// Money returned.
    Refunded,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Draft,
        OrderStatus::Placed,
        OrderStatus::Paid,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Canceled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::Placed => "placed",
            OrderStatus::Paid => "paid",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Canceled => "canceled",
            OrderStatus::Refunded => "refunded",
        }
    }

    /// Label shown in the back-office.
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "Ciornă",
            OrderStatus::Placed => "Plasată",
            OrderStatus::Paid => "Plătită",
            OrderStatus::Shipped => "Expediată",
            OrderStatus::Delivered => "Livrată",
            OrderStatus::Canceled => "Anulată",
            OrderStatus::Refunded => "Rambursată",
        }
    }

    /// Check if order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered | OrderStatus::Canceled | OrderStatus::Refunded
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == key)
            .ok_or_else(|| CommerceError::UnknownStatus(s.to_string()))
    }
}

/// A placed order as stored by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    /// Stored subtotal. Not guaranteed to match the items.
    pub subtotal_bani: i64,
    #[serde(default)]
    pub shipping_bani: i64,
    pub total_bani: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Order {
    pub fn subtotal(&self) -> Money {
        Money::new(self.subtotal_bani)
    }

    pub fn shipping(&self) -> Money {
        Money::new(self.shipping_bani)
    }

    pub fn total(&self) -> Money {
        Money::new(self.total_bani)
    }

    /// Apply an admin shipping-cost edit.
    ///
    /// The total is recomputed from the stored subtotal; line items are not
    /// consulted.
    pub fn with_shipping(mut self, shipping_bani: i64) -> Result<Self, CommerceError> {
        if shipping_bani < 0 {
            return Err(CommerceError::invalid(
                "shipping_bani",
                "Shipping cost cannot be negative",
            ));
        }
        self.total_bani = self
            .subtotal_bani
            .checked_add(shipping_bani)
            .ok_or(CommerceError::Overflow)?;
        self.shipping_bani = shipping_bani;
        Ok(self)
    }

    /// Whether total == subtotal + shipping.
    pub fn totals_consistent(&self) -> bool {
        self.subtotal_bani.checked_add(self.shipping_bani) == Some(self.total_bani)
    }
}

/// A line of a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub id: OrderItemId,
    pub order_id: OrderId,
    pub item_type: ItemType,
    #[serde(default)]
    pub sku_id: Option<SkuId>,
    #[serde(default)]
    pub config_id: Option<DiscoverySetId>,
    pub quantity: i64,
    pub unit_price_bani: i64,
    pub line_total_bani: i64,
    /// Purchase-time copy of the item, as raw JSON.
    #[serde(default)]
    pub snapshot: serde_json::Value,
}

impl OrderItem {
    pub fn parsed_snapshot(&self) -> Result<ItemSnapshot, CommerceError> {
        ItemSnapshot::from_json(&self.snapshot)
    }

    /// Title for order detail views. Falls back to the item type when the
    /// snapshot cannot be read.
    pub fn display_name(&self) -> String {
        self.parsed_snapshot()
            .map(|s| s.title())
            .unwrap_or_else(|_| self.item_type.as_str().to_string())
    }
}

/// Order row to insert. The backend assigns id and creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrder {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: ShippingAddress,
    pub status: OrderStatus,
    pub subtotal_bani: i64,
    pub shipping_bani: i64,
    pub total_bani: i64,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewOrder {
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            shipping_address: self.shipping_address,
            status: self.status,
            subtotal_bani: self.subtotal_bani,
            shipping_bani: self.shipping_bani,
            total_bani: self.total_bani,
            created_at,
            notes: self.notes,
        }
    }
}

/// Order item row to insert once the order id is known.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewOrderItem {
    pub item_type: ItemType,
    pub sku_id: Option<SkuId>,
    pub config_id: Option<DiscoverySetId>,
    pub quantity: i64,
    pub unit_price_bani: i64,
    pub line_total_bani: i64,
    pub snapshot: serde_json::Value,
}

impl NewOrderItem {
    pub fn into_item(self, id: OrderItemId, order_id: OrderId) -> OrderItem {
        OrderItem {
            id,
            order_id,
            item_type: self.item_type,
            sku_id: self.sku_id,
            config_id: self.config_id,
            quantity: self.quantity,
            unit_price_bani: self.unit_price_bani,
            line_total_bani: self.line_total_bani,
            snapshot: self.snapshot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(subtotal: i64, shipping: i64, total: i64) -> Order {
        Order {
            id: OrderId::new("o1"),
            customer_name: "Ana".to_string(),
            customer_email: "ana@example.ro".to_string(),
            customer_phone: "0722123456".to_string(),
            shipping_address: ShippingAddress::default(),
            status: OrderStatus::Placed,
            subtotal_bani: subtotal,
            shipping_bani: shipping,
            total_bani: total,
            created_at: Utc::now(),
            notes: None,
        }
    }

    #[test]
    fn test_status_round_trip_strings() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert_eq!("Shipped".parse::<OrderStatus>().unwrap(), OrderStatus::Shipped);
        assert!(matches!(
            "lost".parse::<OrderStatus>(),
            Err(CommerceError::UnknownStatus(_))
        ));
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(!OrderStatus::Paid.is_terminal());
    }

    #[test]
    fn test_with_shipping_uses_stored_subtotal() {
        let edited = order(10000, 1500, 11500).with_shipping(0).unwrap();
        assert_eq!(edited.total_bani, 10000);
        assert!(edited.totals_consistent());
    }

    #[test]
    fn test_with_shipping_rejects_negative() {
        assert!(order(10000, 1500, 11500).with_shipping(-1).is_err());
    }

    #[test]
    fn test_inconsistent_totals() {
        assert!(!order(10000, 1500, 12000).totals_consistent());
    }

    #[test]
    fn test_display_name_falls_back() {
        let item = OrderItem {
            id: OrderItemId::new("i1"),
            order_id: OrderId::new("o1"),
            item_type: ItemType::CustomBundle,
            sku_id: None,
            config_id: None,
            quantity: 1,
            unit_price_bani: 100,
            line_total_bani: 100,
            snapshot: serde_json::json!({"legacy": true}),
        };
        assert_eq!(item.display_name(), "custom_bundle");
    }

    #[test]
    fn test_status_serde() {
        let json = serde_json::to_string(&OrderStatus::Canceled).unwrap();
        assert_eq!(json, "\"canceled\"");
    }
}
