//! Shipping rate resolution.
//!
//! Rates are looked up by the region string on the selected address. The
//! resolver is a collaborator of the pricing calculator; carriers with live
//! rate APIs would implement [`ShippingRateResolver`] the same way the
//! table-backed default does.

use std::collections::HashMap;

use pixel_arcade_core::Money;

use crate::config::ShippingConfig;

/// Resolve a shipping cost for a destination region.
pub trait ShippingRateResolver: Send + Sync {
    /// Cost of shipping to `region`.
    ///
    /// Unknown regions cost zero - no address means no shipping cost, and an
    /// unrecognized region is treated the same way rather than blocking
    /// checkout.
    fn rate_for(&self, region: &str) -> Money;
}

/// Table-backed [`ShippingRateResolver`] built from configuration.
#[derive(Debug, Clone)]
pub struct TableRateResolver {
    rates: HashMap<String, Money>,
}

impl TableRateResolver {
    /// Create a resolver from a rate table.
    #[must_use]
    pub fn new(rates: HashMap<String, Money>) -> Self {
        Self { rates }
    }
}

impl From<&ShippingConfig> for TableRateResolver {
    fn from(config: &ShippingConfig) -> Self {
        Self::new(config.rates.clone())
    }
}

impl ShippingRateResolver for TableRateResolver {
    fn rate_for(&self, region: &str) -> Money {
        self.rates.get(region).copied().unwrap_or(Money::ZERO)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_region() {
        let resolver = TableRateResolver::new(HashMap::from([(
            "Metropolitana".to_owned(),
            Money::from(2990),
        )]));
        assert_eq!(resolver.rate_for("Metropolitana"), Money::from(2990));
    }

    #[test]
    fn test_unknown_region_costs_zero() {
        let resolver = TableRateResolver::new(HashMap::new());
        assert_eq!(resolver.rate_for("Atlantis"), Money::ZERO);
    }

    #[test]
    fn test_default_config_table() {
        let resolver = TableRateResolver::from(&ShippingConfig::default());
        assert_eq!(resolver.rate_for("Metropolitana"), Money::from(2990));
        assert_eq!(resolver.rate_for("Magallanes"), Money::from(7990));
    }
}
