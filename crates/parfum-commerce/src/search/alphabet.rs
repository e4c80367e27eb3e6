//! Alphabetical brand index and diacritic-insensitive matching.

use crate::catalog::Product;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Bucket for names that do not start with a Latin letter.
pub const OTHER_BUCKET: char = '#';

/// Bucket keys in display order.
pub const ALPHABET_LETTERS: [char; 27] = [
    '#', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q',
    'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Decompose, drop combining marks, lowercase.
///
/// `"Șampanie"` and `"sampanie"` normalize to the same string.
pub fn normalize_string(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether `text` contains `query`, ignoring case and diacritics.
///
/// An empty or whitespace-only query matches everything.
pub fn matches_search(text: &str, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
        return true;
    }
    normalize_string(text).contains(&normalize_string(query))
}

/// Bucket letter for a name.
pub fn first_letter(s: &str) -> char {
    match normalize_string(s.trim()).chars().next() {
        Some(c) if c.is_ascii_lowercase() => c.to_ascii_uppercase(),
        _ => OTHER_BUCKET,
    }
}

/// A group of items sharing a first letter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LetterBucket<T> {
    pub letter: char,
    pub items: Vec<T>,
}

/// Items grouped into 27 buckets: `#` then `A` to `Z`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlphabetIndex<T> {
    buckets: Vec<LetterBucket<T>>,
}

impl<T> AlphabetIndex<T> {
    fn empty() -> Self {
        Self {
            buckets: ALPHABET_LETTERS
                .iter()
                .map(|&letter| LetterBucket {
                    letter,
                    items: Vec::new(),
                })
                .collect(),
        }
    }

    fn push(&mut self, letter: char, item: T) {
        let slot = ALPHABET_LETTERS
            .iter()
            .position(|&l| l == letter)
            .unwrap_or(0);
        self.buckets[slot].items.push(item);
    }

    /// All buckets, empty ones included.
    pub fn buckets(&self) -> &[LetterBucket<T>] {
        &self.buckets
    }

    /// Items under `letter`; empty for unknown letters.
    pub fn bucket(&self, letter: char) -> &[T] {
        let letter = letter.to_ascii_uppercase();
        self.buckets
            .iter()
            .find(|b| b.letter == letter)
            .map(|b| b.items.as_slice())
            .unwrap_or(&[])
    }

    /// Letters that have at least one item, for the jump bar.
    pub fn non_empty_letters(&self) -> Vec<char> {
        self.buckets
            .iter()
            .filter(|b| !b.items.is_empty())
            .map(|b| b.letter)
            .collect()
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|b| b.items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Items in bucket order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.buckets.iter().flat_map(|b| b.items.iter())
    }

    /// Keep only items whose key matches `query`.
    pub fn filter_by<F>(&self, query: &str, key: F) -> AlphabetIndex<T>
    where
        T: Clone,
        F: Fn(&T) -> &str,
    {
        AlphabetIndex {
            buckets: self
                .buckets
                .iter()
                .map(|b| LetterBucket {
                    letter: b.letter,
                    items: b
                        .items
                        .iter()
                        .filter(|item| matches_search(key(item), query))
                        .cloned()
                        .collect(),
                })
                .collect(),
        }
    }
}

impl<T: AsRef<str> + Clone> AlphabetIndex<T> {
    /// Keep only items matching `query`.
    pub fn filter(&self, query: &str) -> AlphabetIndex<T> {
        self.filter_by(query, |item| item.as_ref())
    }
}

/// Group strings by first letter, keeping input order within a bucket.
pub fn group_by_first_letter<S, I>(items: I) -> AlphabetIndex<S>
where
    S: AsRef<str>,
    I: IntoIterator<Item = S>,
{
    group_by_first_letter_by(items, |s| s.as_ref())
}

/// Group any items by the first letter of `key(item)`.
pub fn group_by_first_letter_by<T, I, F>(items: I, key: F) -> AlphabetIndex<T>
where
    I: IntoIterator<Item = T>,
    F: Fn(&T) -> &str,
{
    let mut index = AlphabetIndex::empty();
    for item in items {
        let letter = first_letter(key(&item));
        index.push(letter, item);
    }
    index
}

/// Distinct brand names, sorted ignoring case and diacritics.
///
/// The first spelling seen for a brand wins.
pub fn unique_brands(products: &[Product]) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for product in products {
        let brand = product.brand.trim();
        if brand.is_empty() {
            continue;
        }
        seen.entry(normalize_string(brand))
            .or_insert_with(|| brand.to_string());
    }
    seen.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_diacritics() {
        assert_eq!(normalize_string("Șampanie Țară"), "sampanie tara");
        assert_eq!(normalize_string("Hermès"), "hermes");
        assert_eq!(normalize_string("ÎNCERCARE"), "incercare");
    }

    #[test]
    fn test_matches_search() {
        assert!(matches_search("Hermès Terre", "herme"));
        assert!(matches_search("Lancôme", "LANCOME"));
        assert!(matches_search("anything", "   "));
        assert!(!matches_search("Dior", "chanel"));
    }

    #[test]
    fn test_bucket_letters() {
        assert_eq!(first_letter("  Ébène"), 'E');
        assert_eq!(first_letter("4711"), '#');
        assert_eq!(first_letter(""), '#');
        assert_eq!(first_letter("Øresund"), '#');
    }

    #[test]
    fn test_group_by_first_letter() {
        let index = group_by_first_letter(vec!["Dior", "4711", "Amouage", "dolce", "Éclat"]);
        assert_eq!(index.buckets().len(), 27);
        assert_eq!(index.buckets()[0].letter, '#');
        assert_eq!(index.bucket('D'), ["Dior", "dolce"]);
        assert_eq!(index.bucket('e'), ["Éclat"]);
        assert_eq!(index.bucket('#'), ["4711"]);
        assert_eq!(index.non_empty_letters(), vec!['#', 'A', 'D', 'E']);
        assert_eq!(index.len(), 5);
    }

    #[test]
    fn test_filter_keeps_buckets() {
        let index = group_by_first_letter(vec!["Dior".to_string(), "Diptyque".to_string()]);
        let filtered = index.filter("ptyq");
        assert_eq!(filtered.buckets().len(), 27);
        assert_eq!(filtered.bucket('D'), ["Diptyque".to_string()]);
    }

    #[test]
    fn test_group_by_key() {
        let products = vec![
            Product::new("p1", "Aventus", "Creed"),
            Product::new("p2", "Sauvage", "Dior"),
        ];
        let index = group_by_first_letter_by(products, |p| p.name.as_str());
        assert_eq!(index.bucket('S')[0].brand, "Dior");
    }

    #[test]
    fn test_unique_brands() {
        let products = vec![
            Product::new("p1", "A", "Hermès"),
            Product::new("p2", "B", "Chanel"),
            Product::new("p3", "C", "hermes"),
            Product::new("p4", "D", "  "),
        ];
        assert_eq!(unique_brands(&products), vec!["Chanel", "Hermès"]);
    }
}
