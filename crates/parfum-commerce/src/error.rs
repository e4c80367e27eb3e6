//! Commerce error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors that can occur in storefront operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommerceError {
    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// SKU not found.
    #[error("SKU not found: {0}")]
    SkuNotFound(String),

    /// Discovery set not found.
    #[error("Discovery set not found: {0}")]
    DiscoverySetNotFound(String),

    /// Order not found.
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    /// Entry not in cart.
    #[error("Entry not in cart: {0}")]
    EntryNotInCart(String),

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Invalid quantity.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Quantity exceeds maximum allowed.
    #[error("Quantity {0} exceeds maximum allowed ({1})")]
    QuantityExceedsLimit(i64, i64),

    /// Discovery set is not active.
    #[error("Discovery set is not available: {0}")]
    DiscoverySetUnavailable(String),

    /// Unknown order status string.
    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    /// Unknown sort key.
    #[error("Unknown sort key: {0}")]
    UnknownSort(String),

    /// Arithmetic overflow.
    #[error("Arithmetic overflow in money calculation")]
    Overflow,

    /// Snapshot could not be read.
    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// One or more form fields failed validation.
    #[error("Validation failed: {}", format_fields(.0))]
    Validation(Vec<FieldError>),
}

impl CommerceError {
    /// Build a validation error for a single field.
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        CommerceError::Validation(vec![FieldError::new(field, message)])
    }

    /// Field errors, if this is a validation failure.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            CommerceError::Validation(fields) => fields,
            _ => &[],
        }
    }
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::InvalidSnapshot(e.to_string())
    }
}

/// A single inline validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Form field name.
    pub field: String,
    /// Message shown next to the field.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Turn collected field errors into a result.
pub(crate) fn into_validation(errors: Vec<FieldError>) -> Result<(), CommerceError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CommerceError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_lists_fields() {
        let err = CommerceError::Validation(vec![
            FieldError::new("email", "required"),
            FieldError::new("phone", "too short"),
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: email: required; phone: too short"
        );
        assert_eq!(err.field_errors().len(), 2);
    }

    #[test]
    fn test_non_validation_has_no_fields() {
        assert!(CommerceError::EmptyCart.field_errors().is_empty());
    }
}
