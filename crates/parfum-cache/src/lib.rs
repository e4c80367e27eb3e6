//! In-process query cache for the Parfum storefront.
//!
//! Backend reads are cached under namespaced keys; mutations drop whole
//! namespaces with [`QueryCache::invalidate_prefix`] so the next read goes
//! back to the backend.
//!
//! # Example
//!
//! ```rust,ignore
//! use parfum_cache::{cache_key, QueryCache};
//!
//! let cache = QueryCache::with_ttl(Duration::from_secs(60));
//!
//! let products: Vec<Product> = cache
//!     .get_or_try_insert_with(&cache_key!("products", "all"), || backend.list_products())
//!     .await?;
//!
//! // After an admin edit
//! cache.invalidate_prefix("products:");
//! ```

mod error;
mod query;

pub use error::CacheError;
pub use query::{CacheStats, QueryCache};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{cache_key, CacheError, CacheStats, QueryCache};
}
