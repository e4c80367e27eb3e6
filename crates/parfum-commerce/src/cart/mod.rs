//! Shopping cart module.
//!
//! Contains cart entries for single SKUs and discovery sets, the snapshots
//! written to order items, and cart pricing.

#[allow(clippy::module_inception)]
mod cart;
mod entry;
mod pricing;
mod snapshot;

pub use cart::{AddAcknowledgement, Cart, ACK_DURATION, MAX_QUANTITY_PER_ITEM};
pub use entry::{BundlePick, CartEntry, ResolvedSlot};
pub use pricing::{CartQuote, QuoteLine};
pub use snapshot::{ItemSnapshot, ItemType, SlotSnapshot};
