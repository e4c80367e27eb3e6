//! Search module.
//!
//! Contains the alphabetical brand index, diacritic-insensitive matching,
//! catalog listing filters and pagination.

mod alphabet;
mod catalog;
mod results;

pub use alphabet::{
    first_letter, group_by_first_letter, group_by_first_letter_by, matches_search,
    normalize_string, unique_brands, AlphabetIndex, LetterBucket, ALPHABET_LETTERS, OTHER_BUCKET,
};
pub use catalog::{build_listings, CatalogFilter, CatalogQuery, CatalogSort, ProductListing};
pub use results::{Pagination, SearchResults};
