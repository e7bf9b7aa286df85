//! # Promotion Rules
//!
//! Pure promo eligibility and discount computation. The side-effecting half
//! of promo resolution (the atomic usage reservation) lives behind the
//! engine's promo store port; everything here is deterministic.
//!
//! ## Eligibility Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_eligibility(promo, subtotal, restaurant_id, now)                 │
//! │                                                                         │
//! │  1. is_active?                      ── no ──► Skip: Inactive           │
//! │  2. expires_at unset or future?     ── no ──► Skip: Expired            │
//! │  3. usage headroom?                 ── no ──► Skip: UsageLimitReached  │
//! │  4. subtotal >= minimum_order?      ── no ──► Skip: BelowMinimum       │
//! │  5. restaurant scope matches?       ── no ──► Skip: WrongRestaurant    │
//! │                                                                         │
//! │  Every skip is SOFT: pricing proceeds without the promo and the skip   │
//! │  message is attached to the successful result.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `now` is a parameter, not a clock read, so expiry boundaries are testable.

use chrono::{DateTime, Utc};

use crate::error::PromoSkip;
use crate::money::Money;
use crate::types::{Discount, Promo};

/// A promo that passed eligibility and whose usage was reserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoApplication {
    /// The applied code, as stored in the promotion record.
    pub code: String,

    /// Whether the delivery fee is overridden to zero.
    pub free_delivery: bool,

    /// The computed discount, already capped at the subtotal.
    pub discount_amount: Money,
}

/// Checks whether a promo can apply to this basket.
///
/// Returns the first failing rule as a [`PromoSkip`]; callers treat any skip
/// as "price without discount", never as a basket-level error.
pub fn check_eligibility(
    promo: &Promo,
    subtotal: Money,
    restaurant_id: i64,
    now: DateTime<Utc>,
) -> Result<(), PromoSkip> {
    if !promo.is_active {
        return Err(PromoSkip::Inactive {
            code: promo.code.clone(),
        });
    }

    if promo.is_expired(now) {
        return Err(PromoSkip::Expired {
            code: promo.code.clone(),
        });
    }

    if !promo.has_usage_headroom() {
        return Err(PromoSkip::UsageLimitReached {
            code: promo.code.clone(),
        });
    }

    if subtotal < promo.minimum_order {
        return Err(PromoSkip::BelowMinimum {
            code: promo.code.clone(),
            required: promo.minimum_order,
            subtotal,
        });
    }

    if let Some(scope) = promo.restaurant_scope {
        if scope != restaurant_id {
            return Err(PromoSkip::WrongRestaurant {
                code: promo.code.clone(),
            });
        }
    }

    Ok(())
}

/// Computes the discount a promo takes off the given subtotal.
///
/// Exactly one discount kind applies per promo (the variants are mutually
/// exclusive by construction):
/// - `Percentage`: rounded half away from zero at the minor unit
/// - `Fixed`: capped at the subtotal so the discount never exceeds it
/// - `None`: zero (free-delivery-only promos)
pub fn discount_amount(discount: &Discount, subtotal: Money) -> Money {
    match discount {
        Discount::None => Money::zero(),
        Discount::Percentage { bps } => subtotal.percentage(*bps),
        Discount::Fixed { amount } => (*amount).min(subtotal),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
