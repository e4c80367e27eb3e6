//! Storefront domain types and logic for the Parfum shop.
//!
//! This crate holds everything that can be computed without talking to the
//! backend:
//!
//! - **Catalog**: Products, SKUs, discovery sets, admin drafts
//! - **Cart**: Cart entries for single SKUs and bundles, snapshots, quotes
//! - **Checkout**: Customer form validation, shipping policy, order drafts
//! - **Admin**: Order integrity check and the orders list view
//! - **Search**: Alphabetical indexing, diacritic-insensitive matching, catalog listing
//!
//! # Example
//!
//! ```rust,ignore
//! use parfum_commerce::prelude::*;
//!
//! let mut cart = Cart::new();
//! if let Some(ack) = cart.add_product(&product, &skus, 1)? {
//!     println!("added {}", ack.entry_id);
//! }
//!
//! let quote = cart.quote(&ShippingPolicy::default())?;
//! println!("Total: {}", format_price(quote.total.amount_bani));
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod admin;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod search;

pub use error::CommerceError;
pub use ids::*;
pub use money::{format_checkout_price, format_price, Money};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{CommerceError, FieldError};
    pub use crate::ids::*;
    pub use crate::money::{format_checkout_price, format_price, Money};

    // Catalog
    pub use crate::catalog::{
        select_default_sku, DiscoveryRecommendation, DiscoverySetConfig, DiscoverySetItem,
        Product, ProductDraft, Sku, SkuDraft, PREFERRED_SAMPLE_ML,
    };

    // Cart
    pub use crate::cart::{
        AddAcknowledgement, BundlePick, Cart, CartEntry, CartQuote, ItemSnapshot, ItemType,
        QuoteLine, ResolvedSlot, SlotSnapshot, MAX_QUANTITY_PER_ITEM,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutForm, NewOrder, NewOrderItem, Order, OrderDraft, OrderItem, OrderStatus,
        ShippingAddress, ShippingPolicy,
    };

    // Admin
    pub use crate::admin::{
        check_order_integrity, IntegrityReport, OrderFilter, OrderSort, OrdersPage, OrdersView,
        INTEGRITY_TOLERANCE_BANI, ORDERS_PAGE_SIZE,
    };

    // Search
    pub use crate::search::{
        build_listings, group_by_first_letter, group_by_first_letter_by, matches_search,
        normalize_string, unique_brands, AlphabetIndex, CatalogFilter, CatalogQuery, CatalogSort,
        Pagination, ProductListing, SearchResults,
    };
}
