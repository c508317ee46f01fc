//! Core domain types for the price resolver.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Price, ProductCode};

/// Customer identifier.
pub type CustomerId = i64;

/// Which scope a rule targets. Variant order is precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriceSource {
    Customer,
    Tier,
    Group,
    Normal,
}

impl PriceSource {
    /// Precedence rank, lower wins.
    pub const fn priority(self) -> u8 {
        match self {
            PriceSource::Customer => 1,
            PriceSource::Tier => 2,
            PriceSource::Group => 3,
            PriceSource::Normal => 4,
        }
    }

    /// External tag reported to callers.
    pub const fn as_str(self) -> &'static str {
        match self {
            PriceSource::Customer => "CUSTOMER",
            PriceSource::Tier => "TIER",
            PriceSource::Group => "GROUP",
            PriceSource::Normal => "NORMAL",
        }
    }
}

impl fmt::Display for PriceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The customer scope of a rule, carrying the key its source expects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PriceScope {
    /// Applies to exactly one customer.
    Customer(CustomerId),
    /// Applies to every customer in the named tier.
    Tier(String),
    /// Applies to every customer in the named group.
    Group(String),
    /// Applies to everyone.
    Normal,
}

impl PriceScope {
    pub fn source(&self) -> PriceSource {
        match self {
            PriceScope::Customer(_) => PriceSource::Customer,
            PriceScope::Tier(_) => PriceSource::Tier,
            PriceScope::Group(_) => PriceSource::Group,
            PriceScope::Normal => PriceSource::Normal,
        }
    }
}

/// One price list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceRule {
    pub product_code: ProductCode,
    /// Smallest quantity this price applies to.
    pub min_quantity: u32,
    pub price: Price,
    pub scope: PriceScope,
}

impl PriceRule {
    pub fn new(product_code: ProductCode, min_quantity: u32, price: Price, scope: PriceScope) -> Self {
        Self {
            product_code,
            min_quantity,
            price,
            scope,
        }
    }

    pub fn source(&self) -> PriceSource {
        self.scope.source()
    }
}

/// Tier and group membership of customers. Both are optional per customer.
#[derive(Debug, Clone, Default)]
pub struct CustomerAttributes {
    tiers: HashMap<CustomerId, String>,
    groups: HashMap<CustomerId, String>,
}

impl CustomerAttributes {
    pub fn new(tiers: HashMap<CustomerId, String>, groups: HashMap<CustomerId, String>) -> Self {
        Self { tiers, groups }
    }

    pub fn with_tier(mut self, customer: CustomerId, tier: impl Into<String>) -> Self {
        self.tiers.insert(customer, tier.into());
        self
    }

    pub fn with_group(mut self, customer: CustomerId, group: impl Into<String>) -> Self {
        self.groups.insert(customer, group.into());
        self
    }

    pub fn tier(&self, customer: CustomerId) -> Option<&str> {
        self.tiers.get(&customer).map(String::as_str)
    }

    pub fn group(&self, customer: CustomerId) -> Option<&str> {
        self.groups.get(&customer).map(String::as_str)
    }
}

/// The winning price for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub product_id: ProductCode,
    pub price: Price,
    pub price_type: PriceSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_follows_declaration_order() {
        let sources = [
            PriceSource::Customer,
            PriceSource::Tier,
            PriceSource::Group,
            PriceSource::Normal,
        ];
        let priorities: Vec<u8> = sources.iter().map(|s| s.priority()).collect();
        assert_eq!(priorities, vec![1, 2, 3, 4]);
    }

    #[test]
    fn external_tags() {
        assert_eq!(PriceSource::Customer.to_string(), "CUSTOMER");
        assert_eq!(PriceSource::Tier.to_string(), "TIER");
        assert_eq!(PriceSource::Group.to_string(), "GROUP");
        assert_eq!(PriceSource::Normal.to_string(), "NORMAL");
    }

    #[test]
    fn scope_determines_source() {
        assert_eq!(PriceScope::Customer(6).source(), PriceSource::Customer);
        assert_eq!(PriceScope::Tier("GOLD".into()).source(), PriceSource::Tier);
        assert_eq!(PriceScope::Group("GRP1".into()).source(), PriceSource::Group);
        assert_eq!(PriceScope::Normal.source(), PriceSource::Normal);
    }

    #[test]
    fn customer_attributes_lookup() {
        let customers = CustomerAttributes::default()
            .with_tier(2, "GOLD")
            .with_tier(6, "SILVER")
            .with_group(6, "GRP1");

        assert_eq!(customers.tier(2), Some("GOLD"));
        assert_eq!(customers.group(2), None);
        assert_eq!(customers.tier(6), Some("SILVER"));
        assert_eq!(customers.group(6), Some("GRP1"));
        assert_eq!(customers.tier(99), None);
    }
}
