//! # Totals Assembly
//!
//! Combines subtotal, delivery fee, tax and discount into the final
//! [`PricingResult`], enforcing the non-negativity invariant.

use crate::config::PricingConfig;
use crate::money::Money;
use crate::types::{PricingResult, ValidatedLineItem};

/// Inputs for one totals assembly.
///
/// All components are already rounded; assembly itself is pure integer
/// addition, so no further rounding step can reintroduce drift.
#[derive(Debug, Clone)]
pub struct TotalsInput {
    pub subtotal: Money,
    pub delivery_fee: Money,
    pub tax_amount: Money,
    pub discount_amount: Money,
    pub free_delivery_applied: bool,
    pub promo_code_applied: Option<String>,
    pub items: Vec<ValidatedLineItem>,
}

/// Assembles the final price breakdown.
///
/// `grand_total = subtotal + delivery_fee + tax_amount - discount_amount`.
/// A negative total cannot occur under correct discount capping; it is
/// clamped to zero anyway and flagged via `total_clamped` so the engine can
/// log it.
pub fn assemble(input: TotalsInput, config: &PricingConfig) -> PricingResult {
    let raw_total =
        input.subtotal + input.delivery_fee + input.tax_amount - input.discount_amount;
    let total_clamped = raw_total.is_negative();

    PricingResult {
        subtotal: input.subtotal,
        delivery_fee: input.delivery_fee,
        tax_amount: input.tax_amount,
        tax_rate: config.tax_rate,
        discount_amount: input.discount_amount,
        grand_total: raw_total.clamp_non_negative(),
        free_delivery_applied: input.free_delivery_applied,
        promo_code_applied: input.promo_code_applied,
        currency: config.currency_code.clone(),
        items: input.items,
        total_clamped,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn input(subtotal: i64, fee: i64, tax: i64, discount: i64) -> TotalsInput {
        TotalsInput {
            subtotal: Money::from_minor(subtotal),
            delivery_fee: Money::from_minor(fee),
            tax_amount: Money::from_minor(tax),
            discount_amount: Money::from_minor(discount),
            free_delivery_applied: false,
            promo_code_applied: None,
            items: vec![],
        }
    }

    #[test]
    fn test_grand_total_standard_basket() {
        // 24.00 + 2.99 + 2.04 - 0 = 29.03
        let result = assemble(input(2400, 299, 204, 0), &PricingConfig::default());
        assert_eq!(result.grand_total.minor(), 2903);
        assert!(!result.total_clamped);
        assert_eq!(result.currency, "JOD");
        assert_eq!(result.tax_rate.bps(), 850);
    }

    #[test]
    fn test_discount_reduces_total() {
        // 55.00 + 0 + 4.68 - 5.50 = 54.18
        let result = assemble(input(5500, 0, 468, 550), &PricingConfig::default());
        assert_eq!(result.grand_total.minor(), 5418);
    }

    #[test]
    fn test_negative_total_clamped_and_flagged() {
        // Deliberately uncapped discount to exercise the defensive clamp.
        let result = assemble(input(1000, 0, 85, 2000), &PricingConfig::default());
        assert_eq!(result.grand_total, Money::zero());
        assert!(result.total_clamped);
    }

    #[test]
    fn test_zero_total_is_not_flagged() {
        let result = assemble(input(1000, 0, 0, 1000), &PricingConfig::default());
        assert_eq!(result.grand_total, Money::zero());
        assert!(!result.total_clamped);
    }
}
