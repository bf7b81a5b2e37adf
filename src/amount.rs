//! Monetary amounts in whole cents.
//!
//! Record construction only ever sees [`Cents`]. Dollar strings coming from
//! input files are parsed with `rust_decimal` so no floating point is involved.

use crate::error::{NachaError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

/// A non-negative amount in minor currency units.
///
/// # Examples
///
/// ```
/// use nacha_gen::Cents;
///
/// let amount = Cents::from_dollars("1000.5").unwrap();
/// assert_eq!(amount.get(), 100050);
/// assert_eq!(amount.to_string(), "1000.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cents(u64);

impl Cents {
    /// Zero value.
    pub const ZERO: Self = Cents(0);

    pub fn new(cents: u64) -> Self {
        Cents(cents)
    }

    /// The raw count of cents.
    pub fn get(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses a dollar amount such as `1000`, `1000.5` or `1000.50`.
    ///
    /// Negative amounts and fractions of a cent are rejected.
    pub fn from_dollars(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let invalid = || NachaError::InvalidAmount(trimmed.to_string());

        let dollars = Decimal::from_str(trimmed).map_err(|_| invalid())?;
        if dollars.is_sign_negative() && !dollars.is_zero() {
            return Err(invalid());
        }

        let cents = dollars.checked_mul(Decimal::ONE_HUNDRED).ok_or_else(invalid)?;
        if !cents.fract().is_zero() {
            return Err(invalid());
        }
        cents.to_u64().map(Cents).ok_or_else(invalid)
    }
}

impl From<u64> for Cents {
    fn from(cents: u64) -> Self {
        Cents(cents)
    }
}

impl FromStr for Cents {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        Cents::from_dollars(s)
    }
}

impl fmt::Display for Cents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl<'de> Deserialize<'de> for Cents {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cents::from_dollars(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dollars_exact() {
        assert_eq!(Cents::from_dollars("1000").unwrap().get(), 100000);
        assert_eq!(Cents::from_dollars("2500.00").unwrap().get(), 250000);
        assert_eq!(Cents::from_dollars("0.01").unwrap().get(), 1);
        assert_eq!(Cents::from_dollars("  12.3  ").unwrap().get(), 1230);
        assert_eq!(Cents::from_dollars("0").unwrap(), Cents::ZERO);
    }

    #[test]
    fn test_from_dollars_rejects_sub_cent_and_negative() {
        assert!(matches!(
            Cents::from_dollars("1.005"),
            Err(NachaError::InvalidAmount(_))
        ));
        assert!(matches!(
            Cents::from_dollars("-1.00"),
            Err(NachaError::InvalidAmount(_))
        ));
        assert!(matches!(
            Cents::from_dollars("abc"),
            Err(NachaError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_display_as_dollars() {
        assert_eq!(Cents::new(0).to_string(), "0.00");
        assert_eq!(Cents::new(5).to_string(), "0.05");
        assert_eq!(Cents::new(350000).to_string(), "3500.00");
    }
}
