//! Back-office logic.
//!
//! Contains the order integrity check and the orders table view.

mod integrity;
mod orders;

pub use integrity::{check_order_integrity, describe, IntegrityReport, INTEGRITY_TOLERANCE_BANI};
pub use orders::{OrderFilter, OrderSort, OrdersPage, OrdersView, ORDERS_PAGE_SIZE};
