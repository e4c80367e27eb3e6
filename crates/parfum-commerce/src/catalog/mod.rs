//! Product catalog module.
//!
//! Contains types for products, SKUs, discovery sets, and the admin drafts
//! used to create or edit them.

mod discovery;
mod product;
mod sku;

pub use discovery::{DiscoveryRecommendation, DiscoverySetConfig, DiscoverySetItem};
pub use product::{Product, ProductDraft};
pub use sku::{select_default_sku, Sku, SkuDraft, PREFERRED_SAMPLE_ML};
