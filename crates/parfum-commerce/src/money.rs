//! Money type for representing monetary values.
//!
//! All amounts are integer bani (1/100 of a Leu). Line totals, subtotals and
//! shipping are computed with checked integer arithmetic only.

use crate::error::CommerceError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Number of bani in one leu.
pub const BANI_PER_LEU: i64 = 100;

/// A monetary value in bani.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Money {
    /// Amount in bani.
    pub amount_bani: i64,
}

impl Money {
    /// Create a new Money value from bani.
    pub const fn new(amount_bani: i64) -> Self {
        Self { amount_bani }
    }

    /// Create a Money value from a decimal amount in lei.
    ///
    /// This is the only place a float touches money: converting an admin's
    /// typed "min/max total" into bani.
    ///
    /// ```
    /// use parfum_commerce::money::Money;
    /// let price = Money::from_decimal(49.99);
    /// assert_eq!(price.amount_bani, 4999);
    /// ```
    pub fn from_decimal(lei: f64) -> Self {
        Self::new((lei * BANI_PER_LEU as f64).round() as i64)
    }

    /// Zero lei.
    pub const fn zero() -> Self {
        Self::new(0)
    }

    pub fn is_zero(&self) -> bool {
        self.amount_bani == 0
    }

    pub fn is_positive(&self) -> bool {
        self.amount_bani > 0
    }

    pub fn is_negative(&self) -> bool {
        self.amount_bani < 0
    }

    /// Get the absolute value.
    pub fn abs(&self) -> Self {
        Self::new(self.amount_bani.abs())
    }

    /// Convert to a decimal value in lei (display only).
    pub fn to_decimal(&self) -> f64 {
        self.amount_bani as f64 / BANI_PER_LEU as f64
    }

    /// Add, returning `None` on overflow.
    pub fn checked_add(&self, other: Money) -> Option<Money> {
        self.amount_bani.checked_add(other.amount_bani).map(Money::new)
    }

    /// Subtract, returning `None` on overflow.
    pub fn checked_sub(&self, other: Money) -> Option<Money> {
        self.amount_bani.checked_sub(other.amount_bani).map(Money::new)
    }

    /// Multiply by a quantity, returning `None` on overflow.
    pub fn checked_mul(&self, factor: i64) -> Option<Money> {
        self.amount_bani.checked_mul(factor).map(Money::new)
    }

    /// Multiply by a quantity, mapping overflow to [`CommerceError::Overflow`].
    pub fn try_multiply(&self, factor: i64) -> Result<Money, CommerceError> {
        self.checked_mul(factor).ok_or(CommerceError::Overflow)
    }

    /// Sum an iterator of Money values, mapping overflow to an error.
    pub fn try_sum<I>(iter: I) -> Result<Money, CommerceError>
    where
        I: IntoIterator<Item = Money>,
    {
        iter.into_iter().try_fold(Money::zero(), |acc, m| {
            acc.checked_add(m).ok_or(CommerceError::Overflow)
        })
    }

    /// Format for product pages and the cart (e.g., "50,00 Lei").
    pub fn display(&self) -> String {
        format_with_suffix(self.amount_bani, "Lei")
    }

    /// Compact format for the checkout summary (e.g., "50,00 L").
    pub fn display_checkout(&self) -> String {
        format_with_suffix(self.amount_bani, "L")
    }

    /// Amount without suffix (e.g., "50,00").
    pub fn display_amount(&self) -> String {
        format_amount(self.amount_bani)
    }
}

/// Format bani as a storefront price, e.g. `format_price(5000) == "50,00 Lei"`.
pub fn format_price(amount_bani: i64) -> String {
    Money::new(amount_bani).display()
}

/// Format bani for checkout, e.g. `format_checkout_price(5000) == "50,00 L"`.
pub fn format_checkout_price(amount_bani: i64) -> String {
    Money::new(amount_bani).display_checkout()
}

fn format_amount(amount_bani: i64) -> String {
    let sign = if amount_bani < 0 { "-" } else { "" };
    let abs = amount_bani.unsigned_abs();
    let per_leu = BANI_PER_LEU as u64;
    format!("{}{},{:02}", sign, abs / per_leu, abs % per_leu)
}

fn format_with_suffix(amount_bani: i64, suffix: &str) -> String {
    format!("{} {}", format_amount(amount_bani), suffix)
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::new(self.amount_bani + other.amount_bani)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money::new(self.amount_bani - other.amount_bani)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        Money::new(self.amount_bani * factor)
    }
}

impl From<i64> for Money {
    fn from(amount_bani: i64) -> Self {
        Money::new(amount_bani)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(5000), "50,00 Lei");
        assert_eq!(format_price(4999), "49,99 Lei");
        assert_eq!(format_price(5), "0,05 Lei");
        assert_eq!(format_price(0), "0,00 Lei");
    }

    #[test]
    fn test_format_checkout_price() {
        assert_eq!(format_checkout_price(5000), "50,00 L");
        assert_eq!(format_checkout_price(123456), "1234,56 L");
    }

    #[test]
    fn test_format_negative() {
        assert_eq!(format_price(-150), "-1,50 Lei");
    }

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_bani, 4999);
        assert_eq!(Money::from_decimal(100.0).amount_bani, 10000);
        assert_eq!(Money::from_decimal(0.005).amount_bani, 1);
    }

    #[test]
    fn test_money_to_decimal() {
        let m = Money::new(4999);
        assert!((m.to_decimal() - 49.99).abs() < 0.001);
    }

    #[test]
    fn test_money_arithmetic() {
        let a = Money::new(1000);
        let b = Money::new(300);
        assert_eq!((a + b).amount_bani, 1300);
        assert_eq!((a - b).amount_bani, 700);
        assert_eq!((a * 3).amount_bani, 3000);
    }

    #[test]
    fn test_checked_overflow() {
        let m = Money::new(i64::MAX);
        assert!(m.checked_add(Money::new(1)).is_none());
        assert_eq!(m.try_multiply(2), Err(CommerceError::Overflow));
    }

    #[test]
    fn test_try_sum() {
        let total = Money::try_sum(vec![Money::new(100), Money::new(250)]).unwrap();
        assert_eq!(total.amount_bani, 350);
        assert!(Money::try_sum(vec![Money::new(i64::MAX), Money::new(1)]).is_err());
    }
}
