//! Money type for euro prices.
//!
//! Uses a cents-based integer representation. The data source sends
//! prices as decimal numbers, so the serde form is a decimal as well.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A euro amount stored in cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents.
    pub amount_cents: i64,
}

impl Money {
    /// Create a new Money value from cents.
    pub fn new(amount_cents: i64) -> Self {
        Self { amount_cents }
    }

    /// Create a Money value from a decimal amount.
    ///
    /// ```
    /// use korting_commerce::money::Money;
    /// let price = Money::from_decimal(1.99);
    /// assert_eq!(price.amount_cents, 199);
    /// ```
    pub fn from_decimal(amount: f64) -> Self {
        Self::new((amount * 100.0).round() as i64)
    }

    /// Zero euros.
    pub fn zero() -> Self {
        Self::new(0)
    }

    /// Check if this is negative.
    pub fn is_negative(&self) -> bool {
        self.amount_cents < 0
    }

    /// Convert to a decimal value.
    pub fn to_decimal(&self) -> f64 {
        self.amount_cents as f64 / 100.0
    }

    /// Format with the euro sign (e.g., "€1.99").
    pub fn display(&self) -> String {
        format!("\u{20ac}{}", self.display_amount())
    }

    /// Format without symbol (e.g., "1.99").
    pub fn display_amount(&self) -> String {
        let sign = if self.is_negative() { "-" } else { "" };
        let cents = self.amount_cents.abs();
        format!("{}{}.{:02}", sign, cents / 100, cents % 100)
    }

    /// Amount saved going from `self` down to `discounted`.
    pub fn saving_to(&self, discounted: &Money) -> Money {
        Money::new(self.amount_cents - discounted.amount_cents)
    }

    /// Percentage that `discounted` is below `self`, or `None` for a zero price.
    pub fn discount_percentage_to(&self, discounted: &Money) -> Option<f64> {
        if self.amount_cents <= 0 {
            return None;
        }
        let saved = self.saving_to(discounted).amount_cents as f64;
        Some(saved / self.amount_cents as f64 * 100.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Ok(Money::from_decimal(amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_from_decimal() {
        assert_eq!(Money::from_decimal(49.99).amount_cents, 4999);
        assert_eq!(Money::from_decimal(0.1 + 0.2).amount_cents, 30);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::new(199).display(), "\u{20ac}1.99");
        assert_eq!(Money::new(5).display_amount(), "0.05");
        assert_eq!(Money::new(-250).display_amount(), "-2.50");
    }

    #[test]
    fn test_money_discount_percentage() {
        let original = Money::new(400);
        let discounted = Money::new(300);
        assert_eq!(original.discount_percentage_to(&discounted), Some(25.0));
        assert_eq!(Money::zero().discount_percentage_to(&discounted), None);
    }

    #[test]
    fn test_money_serde_decimal() {
        let m: Money = serde_json::from_str("2.49").unwrap();
        assert_eq!(m.amount_cents, 249);
        assert_eq!(serde_json::to_string(&m).unwrap(), "2.49");
    }
}
