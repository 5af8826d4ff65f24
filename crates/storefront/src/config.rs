//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `STOREFRONT_SHIPPING_RATES` - shipping rate table as comma-separated
//!   `region=cost` pairs (e.g. `Metropolitana=2990,Valparaíso=3990`);
//!   defaults to the built-in regional table
//! - `STOREFRONT_POINTS_BLOCK` - subtotal block size that earns points
//!   (default: 1000, must be > 0)
//! - `STOREFRONT_POINTS_PER_BLOCK` - points awarded per full block
//!   (default: 10, must be >= 0)

use std::collections::HashMap;
use std::env;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

use pixel_arcade_core::Money;

const SHIPPING_RATES_VAR: &str = "STOREFRONT_SHIPPING_RATES";
const POINTS_BLOCK_VAR: &str = "STOREFRONT_POINTS_BLOCK";
const POINTS_PER_BLOCK_VAR: &str = "STOREFRONT_POINTS_PER_BLOCK";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront engine configuration.
#[derive(Debug, Clone, Default)]
pub struct StorefrontConfig {
    /// Shipping rate table.
    pub shipping: ShippingConfig,
    /// Loyalty points accrual parameters.
    pub loyalty: LoyaltyConfig,
}

impl StorefrontConfig {
    /// Load configuration from the environment, falling back to defaults
    /// for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a variable is set but
    /// malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        let shipping = match env::var(SHIPPING_RATES_VAR) {
            Ok(raw) => ShippingConfig::parse(&raw)
                .map_err(|e| ConfigError::InvalidEnvVar(SHIPPING_RATES_VAR.to_owned(), e))?,
            Err(_) => ShippingConfig::default(),
        };

        let loyalty = LoyaltyConfig::parse(
            env::var(POINTS_BLOCK_VAR).ok().as_deref(),
            env::var(POINTS_PER_BLOCK_VAR).ok().as_deref(),
        )?;

        Ok(Self { shipping, loyalty })
    }
}

/// Shipping rate table, keyed by region.
#[derive(Debug, Clone)]
pub struct ShippingConfig {
    /// Cost of shipping to each known region.
    pub rates: HashMap<String, Money>,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        let rates = [
            ("Metropolitana", 2990),
            ("Valparaíso", 3990),
            ("Biobío", 4990),
            ("Antofagasta", 5990),
            ("Magallanes", 7990),
        ]
        .into_iter()
        .map(|(region, cost)| (region.to_owned(), Money::from(cost)))
        .collect();
        Self { rates }
    }
}

impl ShippingConfig {
    /// Parse a rate table from comma-separated `region=cost` pairs.
    ///
    /// # Errors
    ///
    /// Returns a description of the malformed entry.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let mut rates = HashMap::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (region, cost) = entry
                .split_once('=')
                .ok_or_else(|| format!("expected region=cost, got {entry:?}"))?;
            let region = region.trim();
            if region.is_empty() {
                return Err(format!("empty region in {entry:?}"));
            }
            let cost: Decimal = cost
                .trim()
                .parse()
                .map_err(|e| format!("invalid cost in {entry:?}: {e}"))?;
            if cost < Decimal::ZERO {
                return Err(format!("negative cost in {entry:?}"));
            }
            rates.insert(region.to_owned(), Money::new(cost));
        }
        Ok(Self { rates })
    }
}

/// Loyalty points accrual parameters.
///
/// An order earns `floor(subtotal / points_block) × points_per_block`
/// points.
#[derive(Debug, Clone)]
pub struct LoyaltyConfig {
    /// Subtotal block size that earns points.
    pub points_block: Money,
    /// Points awarded per full block.
    pub points_per_block: i64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self {
            points_block: Money::from(1000),
            points_per_block: 10,
        }
    }
}

impl LoyaltyConfig {
    fn parse(block: Option<&str>, per_block: Option<&str>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let points_block = match block {
            Some(raw) => {
                let value: Decimal = raw.trim().parse().map_err(|e| {
                    ConfigError::InvalidEnvVar(POINTS_BLOCK_VAR.to_owned(), format!("{e}"))
                })?;
                if value <= Decimal::ZERO {
                    return Err(ConfigError::InvalidEnvVar(
                        POINTS_BLOCK_VAR.to_owned(),
                        "must be greater than zero".to_owned(),
                    ));
                }
                Money::new(value)
            }
            None => defaults.points_block,
        };

        let points_per_block = match per_block {
            Some(raw) => {
                let value: i64 = raw.trim().parse().map_err(|e| {
                    ConfigError::InvalidEnvVar(POINTS_PER_BLOCK_VAR.to_owned(), format!("{e}"))
                })?;
                if value < 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        POINTS_PER_BLOCK_VAR.to_owned(),
                        "must not be negative".to_owned(),
                    ));
                }
                value
            }
            None => defaults.points_per_block,
        };

        Ok(Self {
            points_block,
            points_per_block,
        })
    }

    /// Points earned for an order subtotal: whole blocks only, floored.
    #[must_use]
    pub fn points_for(&self, subtotal: Money) -> i64 {
        let block = self.points_block.amount();
        if block <= Decimal::ZERO {
            return 0;
        }
        let blocks = (subtotal.amount() / block).floor();
        blocks.to_i64().unwrap_or_default() * self.points_per_block
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rates() {
        let config = ShippingConfig::parse("Metropolitana=2990, Aysén=8990").unwrap();
        assert_eq!(
            config.rates.get("Metropolitana").copied(),
            Some(Money::from(2990))
        );
        assert_eq!(config.rates.get("Aysén").copied(), Some(Money::from(8990)));
    }

    #[test]
    fn test_parse_rates_rejects_malformed() {
        assert!(ShippingConfig::parse("Metropolitana").is_err());
        assert!(ShippingConfig::parse("=2990").is_err());
        assert!(ShippingConfig::parse("Metropolitana=abc").is_err());
        assert!(ShippingConfig::parse("Metropolitana=-5").is_err());
    }

    #[test]
    fn test_parse_rates_empty_is_empty_table() {
        let config = ShippingConfig::parse("").unwrap();
        assert!(config.rates.is_empty());
    }

    #[test]
    fn test_loyalty_defaults() {
        let loyalty = LoyaltyConfig::default();
        assert_eq!(loyalty.points_for(Money::from(950)), 0);
        assert_eq!(loyalty.points_for(Money::from(1999)), 10);
        assert_eq!(loyalty.points_for(Money::from(2000)), 20);
        assert_eq!(loyalty.points_for(Money::ZERO), 0);
    }

    #[test]
    fn test_loyalty_parse_overrides() {
        let loyalty = LoyaltyConfig::parse(Some("500"), Some("5")).unwrap();
        assert_eq!(loyalty.points_for(Money::from(1999)), 15);
    }

    #[test]
    fn test_loyalty_parse_rejects_zero_block() {
        assert!(LoyaltyConfig::parse(Some("0"), None).is_err());
        assert!(LoyaltyConfig::parse(None, Some("-1")).is_err());
    }
}
