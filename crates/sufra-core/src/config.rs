//! # Pricing Configuration
//!
//! Externalized thresholds, fees and rates for the pricing engine.
//!
//! ## Why Injected Configuration?
//! Earlier revisions of this system compiled the fee thresholds and two
//! different tax rates into separate code paths, which drifted. Every
//! tunable now lives here, is injected once into the engine, and can be
//! exercised at boundary values deterministically in tests.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SUFRA_*`)
//! 2. Defaults (this file)
//!
//! ## Thread Safety
//! Configuration is read-only after initialization, so no mutex needed.

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::types::TaxRate;

/// Pricing configuration.
///
/// ## Fields
/// All fields have production defaults; tests construct custom values to
/// exercise tier boundaries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingConfig {
    /// Tax rate applied to the pre-discount subtotal.
    pub tax_rate: TaxRate,

    /// Subtotal at or above which delivery is free.
    pub free_delivery_threshold: Money,

    /// Subtotal at or above which the reduced delivery tier applies.
    pub reduced_delivery_threshold: Money,

    /// Fee cap in the reduced tier.
    pub reduced_delivery_fee: Money,

    /// Fee floor in the standard (low subtotal) tier.
    pub standard_delivery_fee: Money,

    /// Maximum quantity per line item.
    pub max_item_quantity: i64,

    /// Currency code (ISO 4217).
    pub currency_code: String,
}

impl Default for PricingConfig {
    /// Returns the production defaults.
    ///
    /// ## Default Values
    /// - Tax: 8.5% (850 bps)
    /// - Free delivery at 50.00 and above
    /// - Reduced tier from 30.00, capped at 1.99
    /// - Standard tier floor 2.99
    /// - Max quantity per item: 10
    /// - Currency: JOD
    fn default() -> Self {
        PricingConfig {
            tax_rate: TaxRate::from_bps(850),
            free_delivery_threshold: Money::from_minor(5000),
            reduced_delivery_threshold: Money::from_minor(3000),
            reduced_delivery_fee: Money::from_minor(199),
            standard_delivery_fee: Money::from_minor(299),
            max_item_quantity: 10,
            currency_code: "JOD".to_string(),
        }
    }
}

impl PricingConfig {
    /// Creates a PricingConfig from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `SUFRA_TAX_RATE`: tax rate as a percentage (e.g. "8.5")
    /// - `SUFRA_FREE_DELIVERY_THRESHOLD`: minor units (e.g. "5000")
    /// - `SUFRA_REDUCED_DELIVERY_THRESHOLD`: minor units
    /// - `SUFRA_REDUCED_DELIVERY_FEE`: minor units
    /// - `SUFRA_STANDARD_DELIVERY_FEE`: minor units
    /// - `SUFRA_MAX_ITEM_QUANTITY`: integer
    /// - `SUFRA_CURRENCY`: ISO 4217 code
    pub fn from_env() -> Self {
        let mut config = PricingConfig::default();

        if let Ok(rate) = std::env::var("SUFRA_TAX_RATE") {
            if let Ok(pct) = rate.parse::<f64>() {
                config.tax_rate = TaxRate::from_percentage(pct);
            }
        }

        if let Some(minor) = env_minor("SUFRA_FREE_DELIVERY_THRESHOLD") {
            config.free_delivery_threshold = minor;
        }

        if let Some(minor) = env_minor("SUFRA_REDUCED_DELIVERY_THRESHOLD") {
            config.reduced_delivery_threshold = minor;
        }

        if let Some(minor) = env_minor("SUFRA_REDUCED_DELIVERY_FEE") {
            config.reduced_delivery_fee = minor;
        }

        if let Some(minor) = env_minor("SUFRA_STANDARD_DELIVERY_FEE") {
            config.standard_delivery_fee = minor;
        }

        if let Ok(qty) = std::env::var("SUFRA_MAX_ITEM_QUANTITY") {
            if let Ok(qty) = qty.parse::<i64>() {
                config.max_item_quantity = qty;
            }
        }

        if let Ok(currency) = std::env::var("SUFRA_CURRENCY") {
            config.currency_code = currency;
        }

        config
    }

    /// Formats an amount as a currency string for notes and logs.
    ///
    /// ## Example
    /// ```rust
    /// use sufra_core::config::PricingConfig;
    /// use sufra_core::money::Money;
    ///
    /// let config = PricingConfig::default();
    /// assert_eq!(config.format_currency(Money::from_minor(1234)), "12.34 JOD");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        format!("{} {}", amount, self.currency_code)
    }
}

fn env_minor(key: &str) -> Option<Money> {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .map(Money::from_minor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PricingConfig::default();
        assert_eq!(config.tax_rate.bps(), 850);
        assert_eq!(config.free_delivery_threshold.minor(), 5000);
        assert_eq!(config.reduced_delivery_threshold.minor(), 3000);
        assert_eq!(config.reduced_delivery_fee.minor(), 199);
        assert_eq!(config.standard_delivery_fee.minor(), 299);
        assert_eq!(config.max_item_quantity, 10);
        assert_eq!(config.currency_code, "JOD");
    }

    #[test]
    fn test_format_currency() {
        let config = PricingConfig::default();
        assert_eq!(config.format_currency(Money::from_minor(1234)), "12.34 JOD");
        assert_eq!(config.format_currency(Money::from_minor(0)), "0.00 JOD");
    }
}
