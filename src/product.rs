//! Product identifiers and their canonical `P###` form.

use std::fmt;

use crate::resolver::PricingError;

/// A product identifier as supplied by a caller, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductId {
    Number(i64),
    Code(String),
}

impl From<i32> for ProductId {
    fn from(value: i32) -> Self {
        ProductId::Number(value.into())
    }
}

impl From<i64> for ProductId {
    fn from(value: i64) -> Self {
        ProductId::Number(value)
    }
}

impl From<u32> for ProductId {
    fn from(value: u32) -> Self {
        ProductId::Number(value.into())
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        ProductId::Code(value.to_string())
    }
}

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        ProductId::Code(value)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductId::Number(n) => write!(f, "{n}"),
            ProductId::Code(s) => f.write_str(s),
        }
    }
}

/// Canonical product code that rules and queries are compared by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductCode(String);

impl ProductCode {
    /// Normalize a product identifier:
    /// - integers are zero-padded to at least 3 digits (`1` -> `P001`)
    /// - strings starting with `P` (any case) are uppercased, never re-padded
    /// - strings made only of ASCII digits are padded like integers
    ///
    /// Anything else is an [`PricingError::InvalidProductIdentifier`].
    pub fn normalize(product_id: &ProductId) -> Result<Self, PricingError> {
        match product_id {
            ProductId::Number(n) if *n >= 0 => Ok(ProductCode(format!("P{n:03}"))),
            ProductId::Number(_) => Err(PricingError::InvalidProductIdentifier(
                product_id.to_string(),
            )),
            ProductId::Code(raw) if raw.starts_with(['p', 'P']) => {
                // "p1" stays "P1": prefixed codes must already be padded to match rules
                Ok(ProductCode(raw.to_uppercase()))
            }
            ProductId::Code(raw) if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) => {
                let digits = raw.trim_start_matches('0');
                let digits = if digits.is_empty() { "0" } else { digits };
                Ok(ProductCode(format!("P{digits:0>3}")))
            }
            ProductId::Code(raw) => Err(PricingError::InvalidProductIdentifier(raw.clone())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl PartialEq<str> for ProductCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ProductCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
