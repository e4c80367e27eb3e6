//! Cart type.

use crate::cart::{CartEntry, CartQuote, QuoteLine};
use crate::catalog::{select_default_sku, Product, Sku};
use crate::checkout::ShippingPolicy;
use crate::error::CommerceError;
use crate::ids::CartEntryId;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Maximum quantity allowed per cart entry.
pub const MAX_QUANTITY_PER_ITEM: i64 = 99;

/// How long the "added" check mark stays on the button.
pub const ACK_DURATION: Duration = Duration::from_millis(1500);

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Cart {
    /// Entries in insertion order.
    pub entries: Vec<CartEntry>,
    /// Unix timestamp of last update.
    #[serde(default)]
    pub updated_at: i64,
}

/// Confirmation returned by a successful add.
///
/// Only drives the transient button state; it carries no domain meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddAcknowledgement {
    /// Entry that was created or merged into.
    pub entry_id: CartEntryId,
    /// Quantity of the entry after the add.
    pub quantity: i64,
    /// When the add happened.
    pub shown_at: Instant,
}

impl AddAcknowledgement {
    /// Whether the acknowledgement should still be displayed at `now`.
    pub fn is_visible_at(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) < ACK_DURATION
    }
}

impl Cart {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            updated_at: current_timestamp(),
        }
    }

    /// Add an entry, merging with an existing entry for the same item.
    pub fn add_entry(&mut self, entry: CartEntry) -> Result<AddAcknowledgement, CommerceError> {
        if entry.quantity <= 0 {
            return Err(CommerceError::InvalidQuantity(entry.quantity));
        }

        if let Some(existing) = self.entries.iter_mut().find(|e| e.same_item(&entry)) {
            let new_quantity = existing
                .quantity
                .checked_add(entry.quantity)
                .ok_or(CommerceError::Overflow)?;
            if new_quantity > MAX_QUANTITY_PER_ITEM {
                return Err(CommerceError::QuantityExceedsLimit(
                    new_quantity,
                    MAX_QUANTITY_PER_ITEM,
                ));
            }
            existing.quantity = new_quantity;
            let ack = acknowledge(existing);
            self.updated_at = current_timestamp();
            return Ok(ack);
        }

        if entry.quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                entry.quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        let ack = acknowledge(&entry);
        self.entries.push(entry);
        self.updated_at = current_timestamp();
        Ok(ack)
    }

    /// "Add to cart" from a product card.
    ///
    /// Uses the default SKU (2 ml sample, else the first one). Returns
    /// `Ok(None)` without touching the cart when the product has no SKUs.
    pub fn add_product(
        &mut self,
        product: &Product,
        skus: &[Sku],
        quantity: i64,
    ) -> Result<Option<AddAcknowledgement>, CommerceError> {
        let Some(sku) = select_default_sku(skus) else {
            return Ok(None);
        };
        let entry = CartEntry::for_sku(product, sku, quantity)?;
        self.add_entry(entry).map(Some)
    }

    /// Set an entry's quantity. Zero or less removes it.
    pub fn update_quantity(
        &mut self,
        entry_id: &CartEntryId,
        quantity: i64,
    ) -> Result<bool, CommerceError> {
        if quantity <= 0 {
            return Ok(self.remove(entry_id));
        }
        if quantity > MAX_QUANTITY_PER_ITEM {
            return Err(CommerceError::QuantityExceedsLimit(
                quantity,
                MAX_QUANTITY_PER_ITEM,
            ));
        }

        match self.entries.iter_mut().find(|e| &e.id == entry_id) {
            Some(entry) => {
                entry.quantity = quantity;
                self.updated_at = current_timestamp();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, entry_id: &CartEntryId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| &e.id != entry_id);
        let removed = self.entries.len() < len_before;
        if removed {
            self.updated_at = current_timestamp();
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.updated_at = current_timestamp();
    }

    pub fn get(&self, entry_id: &CartEntryId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.id == entry_id)
    }

    /// Total item count (sum of quantities), shown on the cart badge.
    pub fn item_count(&self) -> i64 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of line totals.
    pub fn subtotal(&self) -> Result<Money, CommerceError> {
        let totals = self
            .entries
            .iter()
            .map(CartEntry::line_total)
            .collect::<Result<Vec<_>, _>>()?;
        Money::try_sum(totals)
    }

    /// Price the cart with the given shipping policy.
    pub fn quote(&self, policy: &ShippingPolicy) -> Result<CartQuote, CommerceError> {
        let lines = self
            .entries
            .iter()
            .map(|e| {
                Ok(QuoteLine {
                    entry_id: e.id.clone(),
                    name: e.name.clone(),
                    size_label: e.size_label.clone(),
                    quantity: e.quantity,
                    unit_price: e.unit_price,
                    line_total: e.line_total()?,
                })
            })
            .collect::<Result<Vec<_>, CommerceError>>()?;

        let subtotal = Money::try_sum(lines.iter().map(|l| l.line_total))?;
        let shipping = policy.shipping_for(subtotal, self.is_empty());
        let total = subtotal
            .checked_add(shipping)
            .ok_or(CommerceError::Overflow)?;

        Ok(CartQuote {
            lines,
            subtotal,
            shipping,
            total,
        })
    }
}

fn acknowledge(entry: &CartEntry) -> AddAcknowledgement {
    AddAcknowledgement {
        entry_id: entry.id.clone(),
        quantity: entry.quantity,
        shown_at: Instant::now(),
    }
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
