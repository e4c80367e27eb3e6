//! Turning a cart into order rows.

use crate::cart::Cart;
use crate::checkout::{CheckoutForm, NewOrder, NewOrderItem, OrderStatus, ShippingPolicy};
use crate::error::CommerceError;

/// Everything needed to persist an order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub order: NewOrder,
    pub items: Vec<NewOrderItem>,
}

impl OrderDraft {
    /// Build the order and item rows for a checkout.
    ///
    /// The form is validated first; an empty cart is rejected.
    pub fn from_cart(
        cart: &Cart,
        form: CheckoutForm,
        policy: &ShippingPolicy,
    ) -> Result<Self, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        let form = form.validate()?;
        let quote = cart.quote(policy)?;

        let items = cart
            .entries
            .iter()
            .map(|entry| {
                Ok(NewOrderItem {
                    item_type: entry.item_type,
                    sku_id: entry.sku_id.clone(),
                    config_id: entry.config_id.clone(),
                    quantity: entry.quantity,
                    unit_price_bani: entry.unit_price.amount_bani,
                    line_total_bani: entry.line_total()?.amount_bani,
                    snapshot: entry.snapshot()?.to_json()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let order = NewOrder {
            customer_name: form.customer_name,
            customer_email: form.customer_email,
            customer_phone: form.customer_phone,
            shipping_address: form.shipping_address,
            status: OrderStatus::Placed,
            subtotal_bani: quote.subtotal.amount_bani,
            shipping_bani: quote.shipping.amount_bani,
            total_bani: quote.total.amount_bani,
            notes: form.notes,
        };

        Ok(Self { order, items })
    }

    pub fn item_count(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::ItemType;
    use crate::catalog::{Product, Sku};
    use crate::checkout::ShippingAddress;

    fn form() -> CheckoutForm {
        CheckoutForm {
            customer_name: "Ana Popescu".to_string(),
            customer_email: "ana@example.ro".to_string(),
            customer_phone: "0722123456".to_string(),
            shipping_address: ShippingAddress::new("Str. Florilor 3", "Iași"),
            notes: None,
        }
    }

    #[test]
    fn test_empty_cart_rejected() {
        let result = OrderDraft::from_cart(&Cart::new(), form(), &ShippingPolicy::default());
        assert_eq!(result, Err(CommerceError::EmptyCart));
    }

    #[test]
    fn test_invalid_form_rejected() {
        let mut cart = Cart::new();
        let product = Product::new("p1", "Oud Wood", "Tom Ford");
        cart.add_product(&product, &[Sku::new("s1", "p1", 2, 4000)], 1)
            .unwrap();
        let mut bad = form();
        bad.customer_email = String::new();
        assert!(OrderDraft::from_cart(&cart, bad, &ShippingPolicy::default()).is_err());
    }

    #[test]
    fn test_draft_totals_and_snapshots() {
        let mut cart = Cart::new();
        let product = Product::new("p1", "Oud Wood", "Tom Ford");
        cart.add_product(&product, &[Sku::new("s1", "p1", 2, 4000)], 3)
            .unwrap();

        let draft = OrderDraft::from_cart(&cart, form(), &ShippingPolicy::default()).unwrap();
        assert_eq!(draft.order.status, OrderStatus::Placed);
        assert_eq!(draft.order.subtotal_bani, 12000);
        assert_eq!(draft.order.shipping_bani, 1500);
        assert_eq!(draft.order.total_bani, 13500);
        assert_eq!(draft.items.len(), 1);
        assert_eq!(draft.items[0].item_type, ItemType::Sku);
        assert_eq!(draft.items[0].line_total_bani, 12000);
        assert_eq!(draft.items[0].snapshot["product_name"], "Oud Wood");
        assert_eq!(draft.item_count(), 3);
    }
}
