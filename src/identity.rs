//! Originator identity and routing numbers.
//!
//! Numeric identity fields are validated when constructed. Once an
//! [`OriginIdentity`] or [`RoutingNumber`] exists, its digits are known to
//! fit their record slots exactly.

use crate::error::{NachaError, Result};
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Maximum length of the company name in batch records.
pub const COMPANY_NAME_WIDTH: usize = 16;

/// Checks that `value` is exactly `len` ASCII digits.
pub(crate) fn require_digits(
    field: &'static str,
    value: &str,
    len: usize,
    expected: &'static str,
) -> Result<()> {
    if value.len() == len && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(NachaError::InvalidIdentityFormat {
            field,
            value: value.to_string(),
            expected,
        })
    }
}

/// A 9-digit ABA routing number: 8-digit DFI identifier plus check digit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoutingNumber(String);

impl RoutingNumber {
    /// Validates and wraps a routing number.
    ///
    /// A check digit that does not verify is logged, not rejected, since
    /// test and placeholder routing numbers are routinely used.
    pub fn parse(value: &str) -> Result<Self> {
        require_digits("routing number", value, 9, "9 digits")?;
        let routing = RoutingNumber(value.to_string());
        if !routing.check_digit_valid() {
            warn!("Routing number {} fails the ABA check digit", value);
        }
        Ok(routing)
    }

    /// The 8-digit receiving/originating DFI identification.
    pub fn dfi_identifier(&self) -> &str {
        &self.0[..8]
    }

    /// The ninth digit.
    pub fn check_digit(&self) -> &str {
        &self.0[8..]
    }

    /// The DFI identifier as a number, the amount it adds to an entry hash.
    pub fn hash_value(&self) -> u64 {
        self.dfi_identifier()
            .bytes()
            .fold(0, |acc, b| acc * 10 + u64::from(b - b'0'))
    }

    /// Whether the check digit matches the 3-7-1 weighted sum.
    pub fn check_digit_valid(&self) -> bool {
        const WEIGHTS: [u32; 9] = [3, 7, 1, 3, 7, 1, 3, 7, 1];
        let sum: u32 = self
            .0
            .bytes()
            .zip(WEIGHTS)
            .map(|(b, w)| u32::from(b - b'0') * w)
            .sum();
        sum % 10 == 0
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoutingNumber {
    type Err = NachaError;

    fn from_str(s: &str) -> Result<Self> {
        RoutingNumber::parse(s.trim())
    }
}

impl fmt::Display for RoutingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who is sending the file and to which bank.
///
/// Immutable for the lifetime of a generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginIdentity {
    immediate_destination: RoutingNumber,
    immediate_origin: String,
    company_name: String,
    company_id: String,
}

impl OriginIdentity {
    /// Builds an identity, validating every numeric field.
    ///
    /// `company_name` longer than 16 characters is truncated with a warning.
    pub fn new(
        immediate_destination: &str,
        immediate_origin: &str,
        company_name: &str,
        company_id: &str,
    ) -> Result<Self> {
        let immediate_destination = RoutingNumber::parse(immediate_destination)?;
        require_digits("immediate origin", immediate_origin, 10, "10 digits")?;
        require_digits("company identification", company_id, 10, "10 digits")?;

        let company_name = if company_name.chars().count() > COMPANY_NAME_WIDTH {
            let truncated: String = company_name.chars().take(COMPANY_NAME_WIDTH).collect();
            warn!(
                "company name '{}' truncated to {} characters: '{}'",
                company_name, COMPANY_NAME_WIDTH, truncated
            );
            truncated
        } else {
            company_name.to_string()
        };

        Ok(OriginIdentity {
            immediate_destination,
            immediate_origin: immediate_origin.to_string(),
            company_name,
            company_id: company_id.to_string(),
        })
    }

    pub fn immediate_destination(&self) -> &RoutingNumber {
        &self.immediate_destination
    }

    pub fn immediate_origin(&self) -> &str {
        &self.immediate_origin
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn company_id(&self) -> &str {
        &self.company_id
    }

    /// Originating DFI identification written in batch records and trace numbers.
    pub fn originating_dfi(&self) -> &str {
        self.immediate_destination.dfi_identifier()
    }
}
