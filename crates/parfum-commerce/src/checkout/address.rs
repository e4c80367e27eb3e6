//! Shipping address.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Delivery address stored as JSON on the order row.
///
/// Older rows may carry fields this type does not know about; they are kept
/// in `extra` and written back untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub county: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default = "default_country")]
    pub country: String,
    /// Unknown keys, passed through.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

fn default_country() -> String {
    "RO".to_string()
}

impl Default for ShippingAddress {
    fn default() -> Self {
        Self::new("", "")
    }
}

impl ShippingAddress {
    pub fn new(street: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            county: None,
            postal_code: None,
            country: default_country(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_county(mut self, county: impl Into<String>) -> Self {
        self.county = Some(county.into());
        self
    }

    pub fn with_postal_code(mut self, code: impl Into<String>) -> Self {
        self.postal_code = Some(code.into());
        self
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        let mut parts = Vec::new();
        for part in [Some(&self.street), Some(&self.city)]
            .into_iter()
            .chain([self.county.as_ref(), self.postal_code.as_ref()])
            .flatten()
        {
            if !part.trim().is_empty() {
                parts.push(part.trim().to_string());
            }
        }
        if !self.country.is_empty() {
            parts.push(self.country.clone());
        }
        parts.join(", ")
    }

    pub fn is_complete(&self) -> bool {
        !self.street.trim().is_empty() && !self.city.trim().is_empty()
    }
}
