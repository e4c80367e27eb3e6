//! Rows that only the store layer deals with.

use chrono::{DateTime, Utc};
use parfum_commerce::search::normalize_string;
use parfum_commerce::UserId;
use serde::{Deserialize, Serialize};

/// Artwork shown next to a brand in the brand index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrandImage {
    pub brand: String,
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl BrandImage {
    pub fn new(brand: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            image_url: image_url.into(),
            updated_at: Some(Utc::now()),
        }
    }

    /// Storage object name for a brand's artwork, e.g. `"hermes.png"`.
    pub fn object_name(brand: &str, extension: &str) -> String {
        let slug: String = normalize_string(brand.trim())
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
            .collect();
        let slug = slug
            .split('-')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        let slug = if slug.is_empty() { "brand".to_string() } else { slug };
        let extension = extension.trim_start_matches('.').to_ascii_lowercase();
        if extension.is_empty() {
            slug
        } else {
            format!("{}.{}", slug, extension)
        }
    }
}

/// A storefront search, recorded for analytics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchEvent {
    pub query: String,
    pub normalized_query: String,
    pub result_count: i64,
    pub created_at: DateTime<Utc>,
}

impl SearchEvent {
    pub fn new(query: &str, result_count: i64) -> Self {
        let query = query.trim().to_string();
        Self {
            normalized_query: normalize_string(&query),
            query,
            result_count,
            created_at: Utc::now(),
        }
    }
}

/// The signed-in account, as reported by the auth service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl AuthUser {
    /// Email if known, else the id.
    pub fn label(&self) -> String {
        self.email.clone().unwrap_or_else(|| self.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_name() {
        assert_eq!(BrandImage::object_name("Hermès", "PNG"), "hermes.png");
        assert_eq!(
            BrandImage::object_name(" Maison Francis Kurkdjian ", ".webp"),
            "maison-francis-kurkdjian.webp"
        );
        assert_eq!(
            BrandImage::object_name("L'Artisan  Parfumeur", "jpg"),
            "l-artisan-parfumeur.jpg"
        );
        assert_eq!(BrandImage::object_name("???", "jpg"), "brand.jpg");
    }

    #[test]
    fn test_search_event_normalizes() {
        let event = SearchEvent::new("  Șampanie ", 3);
        assert_eq!(event.query, "Șampanie");
        assert_eq!(event.normalized_query, "sampanie");
    }

    #[test]
    fn test_auth_user_label() {
        let user = AuthUser {
            id: UserId::new("u1"),
            email: None,
        };
        assert_eq!(user.label(), "u1");
    }
}
