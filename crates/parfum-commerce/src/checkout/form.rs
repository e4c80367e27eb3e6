//! Checkout form validation.

use crate::checkout::ShippingAddress;
use crate::error::{into_validation, CommerceError, FieldError};
use serde::{Deserialize, Serialize};

/// Minimum number of digits in a phone number.
pub const MIN_PHONE_DIGITS: usize = 10;

/// Customer details entered on the checkout page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub shipping_address: ShippingAddress,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutForm {
    /// Check every field and report all problems at once.
    ///
    /// Returns the form with surrounding whitespace removed.
    pub fn validate(self) -> Result<Self, CommerceError> {
        let form = self.trimmed();
        let mut errors = Vec::new();

        if form.customer_name.is_empty() {
            errors.push(FieldError::new("customer_name", "Numele este obligatoriu"));
        }
        if form.customer_email.is_empty() {
            errors.push(FieldError::new("customer_email", "Email-ul este obligatoriu"));
        } else if !is_plausible_email(&form.customer_email) {
            errors.push(FieldError::new("customer_email", "Email invalid"));
        }
        let digits = form
            .customer_phone
            .chars()
            .filter(|c| c.is_ascii_digit())
            .count();
        if form.customer_phone.is_empty() {
            errors.push(FieldError::new("customer_phone", "Telefonul este obligatoriu"));
        } else if digits < MIN_PHONE_DIGITS {
            errors.push(FieldError::new("customer_phone", "Număr de telefon invalid"));
        }
        if form.shipping_address.street.is_empty() {
            errors.push(FieldError::new("shipping_address.street", "Adresa este obligatorie"));
        }
        if form.shipping_address.city.is_empty() {
            errors.push(FieldError::new("shipping_address.city", "Orașul este obligatoriu"));
        }

        into_validation(errors)?;
        Ok(form)
    }

    fn trimmed(mut self) -> Self {
        self.customer_name = self.customer_name.trim().to_string();
        self.customer_email = self.customer_email.trim().to_string();
        self.customer_phone = self.customer_phone.trim().to_string();
        self.shipping_address.street = self.shipping_address.street.trim().to_string();
        self.shipping_address.city = self.shipping_address.city.trim().to_string();
        self.notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain
                    .split_once('.')
                    .map(|(host, tld)| !host.is_empty() && !tld.is_empty())
                    .unwrap_or(false)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> CheckoutForm {
        CheckoutForm {
            customer_name: " Ana Popescu ".to_string(),
            customer_email: "ana@example.ro".to_string(),
            customer_phone: "0722 123 456".to_string(),
            shipping_address: ShippingAddress::new("Str. Florilor 3", "Iași"),
            notes: Some("  ".to_string()),
        }
    }

    #[test]
    fn test_valid_form_is_trimmed() {
        let form = valid_form().validate().unwrap();
        assert_eq!(form.customer_name, "Ana Popescu");
        assert_eq!(form.notes, None);
    }

    #[test]
    fn test_collects_all_errors() {
        let form = CheckoutForm {
            customer_email: "ana.example.ro".to_string(),
            customer_phone: "0722".to_string(),
            ..CheckoutForm::default()
        };
        let err = form.validate().unwrap_err();
        let fields: Vec<_> = err.field_errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "customer_name",
                "customer_email",
                "customer_phone",
                "shipping_address.street",
                "shipping_address.city",
            ]
        );
    }

    #[test]
    fn test_email_rules() {
        assert!(is_plausible_email("a@b.ro"));
        assert!(!is_plausible_email("a@b"));
        assert!(!is_plausible_email("@b.ro"));
        assert!(!is_plausible_email("a@.ro"));
        assert!(!is_plausible_email("a@b@c.ro"));
    }
}
