//! Backend access and services for the Parfum shop.
//!
//! - [`Backend`]: the data seam, with [`RestBackend`] for the hosted
//!   service and [`MemoryBackend`] for tests and fixture files
//! - [`Storefront`]: cached catalog reads, cart additions, checkout
//! - [`AdminConsole`]: order management and catalog edits for admins
//!
//! # Example
//!
//! ```rust,ignore
//! use parfum_store::prelude::*;
//!
//! let backend = Arc::new(RestBackend::new(url, anon_key));
//! let cache = Arc::new(QueryCache::with_ttl(Duration::from_secs(60)));
//! let shop = Storefront::new(backend, cache);
//!
//! let mut cart = Cart::new();
//! shop.add_product_to_cart(&mut cart, &product_id, 1).await?;
//! let placed = shop.place_order(&mut cart, form).await?;
//! ```

mod admin;
pub mod backend;
mod error;
mod memory;
pub mod models;
mod rest;
mod storefront;

pub use admin::{AdminConsole, OrderDetail};
pub use backend::{Backend, BRAND_IMAGES_BUCKET};
pub use error::{ErrorKind, StoreError};
pub use memory::{Fixture, MemoryBackend};
pub use models::{AuthUser, BrandImage, SearchEvent};
pub use rest::RestBackend;
pub use storefront::{DiscoverySetDetail, PlacedOrder, Storefront, DEFAULT_PAGE_SIZE};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AdminConsole, Backend, ErrorKind, Fixture, MemoryBackend, RestBackend, StoreError,
        Storefront, BRAND_IMAGES_BUCKET,
    };
    pub use parfum_cache::QueryCache;
    pub use parfum_commerce::prelude::*;
}
