//! Catalog listing: filters, sort orders and paging for the product grid.

use crate::catalog::{select_default_sku, Product, Sku};
use crate::error::CommerceError;
use crate::search::{matches_search, normalize_string, Pagination, SearchResults};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;

/// A product with its SKUs, as shown on a product card.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListing {
    pub product: Product,
    pub skus: Vec<Sku>,
    /// SKU used for the card price and the quick "add to cart".
    pub default_sku: Option<Sku>,
}

impl ProductListing {
    pub fn new(product: Product, skus: Vec<Sku>) -> Self {
        let default_sku = select_default_sku(&skus).cloned();
        Self {
            product,
            skus,
            default_sku,
        }
    }

    /// Card price in bani, if the product has any SKU.
    pub fn price_bani(&self) -> Option<i64> {
        self.default_sku.as_ref().map(|s| s.price_bani)
    }

    pub fn in_stock(&self) -> bool {
        self.skus.iter().any(Sku::in_stock)
    }

    fn matches_text(&self, query: &str) -> bool {
        let p = &self.product;
        matches_search(&p.name, query)
            || matches_search(&p.brand, query)
            || p.all_notes().any(|n| matches_search(n, query))
    }
}

/// Group a flat SKU list under its products, keeping product order.
pub fn build_listings(products: Vec<Product>, skus: &[Sku]) -> Vec<ProductListing> {
    products
        .into_iter()
        .map(|product| {
            let own = skus
                .iter()
                .filter(|s| s.product_id == product.id)
                .cloned()
                .collect();
            ProductListing::new(product, own)
        })
        .collect()
}

/// A single catalog filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum CatalogFilter {
    Brand(String),
    Family(String),
    Concentration(String),
    GenderNeutral,
    /// Name, brand or any note.
    Text(String),
    /// Inclusive bounds on the card price, in bani.
    PriceRange {
        min: Option<i64>,
        max: Option<i64>,
    },
    InStock,
}

impl CatalogFilter {
    pub fn matches(&self, listing: &ProductListing) -> bool {
        let p = &listing.product;
        match self {
            CatalogFilter::Brand(brand) => same_text(&p.brand, brand),
            CatalogFilter::Family(family) => {
                p.family.as_deref().is_some_and(|f| same_text(f, family))
            }
            CatalogFilter::Concentration(c) => {
                p.concentration.as_deref().is_some_and(|pc| same_text(pc, c))
            }
            CatalogFilter::GenderNeutral => p.gender_neutral,
            CatalogFilter::Text(query) => listing.matches_text(query),
            CatalogFilter::PriceRange { min, max } => match listing.price_bani() {
                Some(price) => {
                    min.map_or(true, |m| price >= m) && max.map_or(true, |m| price <= m)
                }
                None => false,
            },
            CatalogFilter::InStock => listing.in_stock(),
        }
    }
}

fn same_text(a: &str, b: &str) -> bool {
    normalize_string(a.trim()) == normalize_string(b.trim())
}

/// Sort order for the product grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogSort {
    /// A to Z.
    #[default]
    Name,
    NameDesc,
    PriceAsc,
    PriceDesc,
    /// Most recent launch year first.
    Newest,
    /// Highest rated first.
    Rating,
}

impl CatalogSort {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogSort::Name => "name",
            CatalogSort::NameDesc => "name_desc",
            CatalogSort::PriceAsc => "price_asc",
            CatalogSort::PriceDesc => "price_desc",
            CatalogSort::Newest => "newest",
            CatalogSort::Rating => "rating",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CatalogSort::Name => "Nume (A-Z)",
            CatalogSort::NameDesc => "Nume (Z-A)",
            CatalogSort::PriceAsc => "Preț crescător",
            CatalogSort::PriceDesc => "Preț descrescător",
            CatalogSort::Newest => "Cele mai noi",
            CatalogSort::Rating => "Cele mai apreciate",
        }
    }

    fn compare(&self, a: &ProductListing, b: &ProductListing) -> Ordering {
        let by_name = || {
            normalize_string(&a.product.name).cmp(&normalize_string(&b.product.name))
        };
        match self {
            CatalogSort::Name => by_name(),
            CatalogSort::NameDesc => by_name().reverse(),
            // Listings without a price go last either way.
            CatalogSort::PriceAsc => cmp_missing_last(a.price_bani(), b.price_bani(), false),
            CatalogSort::PriceDesc => cmp_missing_last(a.price_bani(), b.price_bani(), true),
            CatalogSort::Newest => {
                cmp_missing_last(a.product.launch_year, b.product.launch_year, true)
            }
            CatalogSort::Rating => b
                .product
                .rating
                .unwrap_or(0.0)
                .total_cmp(&a.product.rating.unwrap_or(0.0))
                .then_with(|| b.product.review_count.cmp(&a.product.review_count)),
        }
    }
}

fn cmp_missing_last<T: Ord>(a: Option<T>, b: Option<T>, descending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) if descending => b.cmp(&a),
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl FromStr for CatalogSort {
    type Err = CommerceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(CatalogSort::Name),
            "name_desc" => Ok(CatalogSort::NameDesc),
            "price_asc" => Ok(CatalogSort::PriceAsc),
            "price_desc" => Ok(CatalogSort::PriceDesc),
            "newest" => Ok(CatalogSort::Newest),
            "rating" => Ok(CatalogSort::Rating),
            other => Err(CommerceError::UnknownSort(other.to_string())),
        }
    }
}

/// Catalog query: filters, sort and page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogQuery {
    pub filters: Vec<CatalogFilter>,
    pub sort: CatalogSort,
    pub page: i64,
    pub per_page: i64,
}

impl Default for CatalogQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: CatalogSort::default(),
            page: 1,
            per_page: 24,
        }
    }
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text filter. Blank text is ignored.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.trim().is_empty() {
            self.filters.push(CatalogFilter::Text(text));
        }
        self
    }

    pub fn with_filter(mut self, filter: CatalogFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_sort(mut self, sort: CatalogSort) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_pagination(mut self, page: i64, per_page: i64) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Filter (all filters must match), sort stably, then page.
    pub fn apply(&self, listings: &[ProductListing]) -> SearchResults<ProductListing> {
        let mut matched: Vec<ProductListing> = listings
            .iter()
            .filter(|l| self.filters.iter().all(|f| f.matches(l)))
            .cloned()
            .collect();
        matched.sort_by(|a, b| self.sort.compare(a, b));
        SearchResults::paginate(matched, self.page, self.per_page)
    }

    /// Pagination for a result count, without materializing items.
    pub fn pagination_for(&self, total: i64) -> Pagination {
        Pagination::new(self.page, self.per_page, total)
    }
}
