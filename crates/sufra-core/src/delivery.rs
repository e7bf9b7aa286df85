//! # Delivery Fee Tiers
//!
//! Pure tiered mapping from (subtotal, restaurant base fee) to a delivery
//! fee. Deterministic: identical inputs always produce the identical fee.
//!
//! ## Tier Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  subtotal >= free_delivery_threshold      → fee = 0                     │
//! │  subtotal >= reduced_delivery_threshold   → fee = min(reduced, base)    │
//! │  otherwise                                → fee = max(standard, base)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Large baskets ride free; mid-size baskets never pay more than the reduced
//! cap; small baskets always pay at least the platform floor even when the
//! restaurant's own fee is lower.

use crate::config::PricingConfig;
use crate::money::Money;

/// Computes the delivery fee for a basket.
///
/// ## Arguments
/// * `subtotal` - pre-discount basket subtotal
/// * `base_fee` - the restaurant's own delivery fee
/// * `config` - tier thresholds and platform fees
pub fn delivery_fee(subtotal: Money, base_fee: Money, config: &PricingConfig) -> Money {
    if subtotal >= config.free_delivery_threshold {
        return Money::zero();
    }

    if subtotal >= config.reduced_delivery_threshold {
        // Cap at the reduced fee: the mid tier can only lower the price.
        return config.reduced_delivery_fee.min(base_fee);
    }

    // TODO: confirm with product that the low tier is meant to be a floor
    // (max) while the mid tier is a cap (min). The asymmetry is long-standing
    // behavior and is preserved here verbatim.
    config.standard_delivery_fee.max(base_fee)
}

// =============================================================================
// Unit Tests
// =============================================================================
