//! Product types.

use crate::error::{into_validation, CommerceError, FieldError};
use crate::ids::ProductId;
use crate::search::normalize_string;
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Earliest launch year accepted by the admin form.
const MIN_LAUNCH_YEAR: i32 = 1900;

/// Maximum product rating.
const MAX_RATING: f64 = 5.0;

/// A perfume in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product name.
    pub name: String,
    /// Brand (house) name.
    pub brand: String,
    /// Long description.
    #[serde(default)]
    pub description: Option<String>,
    /// Public image URL.
    #[serde(default)]
    pub image_url: Option<String>,
    /// Top notes, in display order.
    #[serde(default)]
    pub top_notes: Vec<String>,
    /// Heart notes, in display order.
    #[serde(default)]
    pub mid_notes: Vec<String>,
    /// Base notes, in display order.
    #[serde(default)]
    pub base_notes: Vec<String>,
    /// Concentration (e.g., "EDP", "Extrait").
    #[serde(default)]
    pub concentration: Option<String>,
    /// Olfactive family (e.g., "Woody").
    #[serde(default)]
    pub family: Option<String>,
    /// Marketed as gender neutral.
    #[serde(default)]
    pub gender_neutral: bool,
    /// Launch year.
    #[serde(default)]
    pub launch_year: Option<i32>,
    /// Average rating (0-5).
    #[serde(default)]
    pub rating: Option<f64>,
    /// Number of reviews.
    #[serde(default)]
    pub review_count: i64,
}

impl Product {
    /// Create a product with only the required fields set.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        brand: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            brand: brand.into(),
            description: None,
            image_url: None,
            top_notes: Vec::new(),
            mid_notes: Vec::new(),
            base_notes: Vec::new(),
            concentration: None,
            family: None,
            gender_neutral: false,
            launch_year: None,
            rating: None,
            review_count: 0,
        }
    }

    /// All notes, top to base.
    pub fn all_notes(&self) -> impl Iterator<Item = &str> {
        self.top_notes
            .iter()
            .chain(self.mid_notes.iter())
            .chain(self.base_notes.iter())
            .map(String::as_str)
    }

    /// Check whether any note matches, ignoring case and diacritics.
    pub fn has_note(&self, note: &str) -> bool {
        let wanted = normalize_string(note.trim());
        self.all_notes().any(|n| normalize_string(n) == wanted)
    }

    /// "Brand Name" display title.
    pub fn title(&self) -> String {
        format!("{} {}", self.brand, self.name)
    }
}

/// Admin form payload for creating or editing a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductDraft {
    /// Existing product id when editing.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub brand: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub top_notes: Vec<String>,
    #[serde(default)]
    pub mid_notes: Vec<String>,
    #[serde(default)]
    pub base_notes: Vec<String>,
    #[serde(default)]
    pub concentration: Option<String>,
    #[serde(default)]
    pub family: Option<String>,
    #[serde(default)]
    pub gender_neutral: bool,
    #[serde(default)]
    pub launch_year: Option<i32>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: i64,
}

impl ProductDraft {
    /// Validate the form and produce the product row to save.
    ///
    /// New products get a generated id. Notes are trimmed and blank entries
    /// dropped; blank optional text fields become `None`.
    pub fn validate(self) -> Result<Product, CommerceError> {
        let mut errors = Vec::new();

        let name = self.name.trim().to_string();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        let brand = self.brand.trim().to_string();
        if brand.is_empty() {
            errors.push(FieldError::new("brand", "Brand is required"));
        }

        if let Some(rating) = self.rating {
            if !(0.0..=MAX_RATING).contains(&rating) {
                errors.push(FieldError::new("rating", "Rating must be between 0 and 5"));
            }
        }

        if let Some(year) = self.launch_year {
            let max_year = chrono::Utc::now().year() + 1;
            if !(MIN_LAUNCH_YEAR..=max_year).contains(&year) {
                errors.push(FieldError::new(
                    "launch_year",
                    format!("Launch year must be between {} and {}", MIN_LAUNCH_YEAR, max_year),
                ));
            }
        }

        if self.review_count < 0 {
            errors.push(FieldError::new("review_count", "Review count cannot be negative"));
        }

        into_validation(errors)?;

        Ok(Product {
            id: self.id.unwrap_or_else(ProductId::generate),
            name,
            brand,
            description: non_blank(self.description),
            image_url: non_blank(self.image_url),
            top_notes: clean_notes(self.top_notes),
            mid_notes: clean_notes(self.mid_notes),
            base_notes: clean_notes(self.base_notes),
            concentration: non_blank(self.concentration),
            family: non_blank(self.family),
            gender_neutral: self.gender_neutral,
            launch_year: self.launch_year,
            rating: self.rating,
            review_count: self.review_count,
        })
    }
}

impl From<Product> for ProductDraft {
    fn from(p: Product) -> Self {
        Self {
            id: Some(p.id),
            name: p.name,
            brand: p.brand,
            description: p.description,
            image_url: p.image_url,
            top_notes: p.top_notes,
            mid_notes: p.mid_notes,
            base_notes: p.base_notes,
            concentration: p.concentration,
            family: p.family,
            gender_neutral: p.gender_neutral,
            launch_year: p.launch_year,
            rating: p.rating,
            review_count: p.review_count,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_notes(notes: Vec<String>) -> Vec<String> {
    notes
        .into_iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect()
}
