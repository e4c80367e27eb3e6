//! Checkout module.
//!
//! Contains the customer form, shipping policy, order rows and the
//! cart-to-order conversion.

mod address;
mod draft;
mod form;
mod order;
mod shipping;

pub use address::ShippingAddress;
pub use draft::OrderDraft;
pub use form::{CheckoutForm, MIN_PHONE_DIGITS};
pub use order::{NewOrder, NewOrderItem, Order, OrderItem, OrderStatus};
pub use shipping::{ShippingPolicy, DEFAULT_FREE_SHIPPING_BANI, DEFAULT_SHIPPING_FEE_BANI};
