//! # Domain Types
//!
//! Core domain types for Sufra pricing.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Read projections (catalog)        Pricing inputs / outputs             │
//! │  ┌─────────────────┐               ┌──────────────────────┐             │
//! │  │   Restaurant    │               │   LineItemRequest    │ untrusted   │
//! │  │  id, is_open,   │               │   dish_id, quantity  │             │
//! │  │  base fee       │               └──────────┬───────────┘             │
//! │  └─────────────────┘                          ▼                         │
//! │  ┌─────────────────┐               ┌──────────────────────┐             │
//! │  │      Dish       │──snapshot────►│  ValidatedLineItem   │ trusted     │
//! │  │  price, avail.  │               │  unit_price frozen   │             │
//! │  └─────────────────┘               └──────────┬───────────┘             │
//! │  ┌─────────────────┐                          ▼                         │
//! │  │      Promo      │               ┌──────────────────────┐             │
//! │  │  Discount,      │──resolution──►│    PricingResult     │ value obj.  │
//! │  │  usage counter  │               │  grand_total >= 0    │             │
//! │  └─────────────────┘               └──────────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! `ValidatedLineItem` freezes the catalog price at validation time. Prices
//! supplied in the request have no representation here at all: tampering with
//! the submitted basket cannot influence the computed totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 850 bps = 8.5% (the configured sales tax)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a fraction (0.085 for 8.5%), for display only.
    #[inline]
    pub fn as_fraction(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Catalog Read Projections
// =============================================================================

/// A restaurant as the pricing engine sees it.
///
/// Read-only projection of the catalog record: just enough to decide whether
/// a basket is priceable and which base delivery fee applies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Restaurant {
    /// Unique identifier.
    pub id: i64,

    /// Display name (used in notes and logs).
    pub name: String,

    /// Whether the restaurant is currently accepting orders.
    pub is_open: bool,

    /// The restaurant's own delivery fee, in minor units.
    pub base_delivery_fee: Money,
}

/// A dish as the pricing engine sees it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    /// Unique identifier.
    pub id: i64,

    /// The restaurant this dish belongs to.
    pub restaurant_id: i64,

    /// Display name shown on the priced line item.
    pub name: String,

    /// Current catalog price. This, never the request, prices the basket.
    pub price: Money,

    /// Whether the dish can currently be ordered.
    pub is_available: bool,
}

// =============================================================================
// Promotions
// =============================================================================

/// The discount a promo grants.
///
/// Percentage and fixed amounts are mutually exclusive by construction:
/// a promo carries exactly one variant, so the exclusivity is structural
/// rather than an if/else convention over nullable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Discount {
    /// No monetary discount (the promo may still grant free delivery).
    None,
    /// Percentage off the subtotal, in basis points (1000 = 10%).
    Percentage { bps: u32 },
    /// Fixed amount off, capped at the subtotal when applied.
    Fixed { amount: Money },
}

/// A promotion code record.
///
/// ## Invariant
/// `times_used <= usage_limit` whenever `usage_limit` is set. The stores
/// enforce this under concurrency via an atomic conditional increment; this
/// type only reports headroom for the pure eligibility check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promo {
    /// The code customers type. Matched case-insensitively by the stores.
    pub code: String,

    /// What the promo takes off the bill.
    pub discount: Discount,

    /// Whether the promo zeroes the delivery fee.
    pub free_delivery: bool,

    /// Minimum subtotal required for the promo to apply.
    pub minimum_order: Money,

    /// Whether the promo is currently enabled.
    pub is_active: bool,

    /// Expiry timestamp; unset means the promo never expires.
    pub expires_at: Option<DateTime<Utc>>,

    /// Maximum number of successful redemptions; unset means unlimited.
    pub usage_limit: Option<i64>,

    /// Redemptions so far.
    pub times_used: i64,

    /// When set, the promo only applies to baskets from this restaurant.
    pub restaurant_scope: Option<i64>,
}

impl Promo {
    /// Checks whether the promo has expired at the given instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expiry) => expiry <= now,
            None => false,
        }
    }

    /// Checks whether at least one redemption remains.
    pub fn has_usage_headroom(&self) -> bool {
        match self.usage_limit {
            Some(limit) => self.times_used < limit,
            None => true,
        }
    }
}

// =============================================================================
// Basket
// =============================================================================

/// A caller-supplied line item. Untrusted input.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
    /// The dish being ordered.
    pub dish_id: i64,

    /// Requested quantity.
    pub quantity: i64,
}

/// A validated, priced line item.
///
/// ## Snapshot Pattern
/// `unit_price` is frozen from the catalog at validation time. There is no
/// constructor taking a caller-supplied price.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedLineItem {
    /// The dish this line refers to.
    pub dish_id: i64,

    /// Dish name at validation time (frozen).
    pub name: String,

    /// Catalog unit price at validation time (frozen).
    pub unit_price: Money,

    /// Quantity ordered.
    pub quantity: i64,

    /// `unit_price * quantity`.
    pub line_total: Money,

    /// Availability at validation time. Always true for items that passed
    /// validation; carried so the result is self-describing.
    pub is_available: bool,
}

impl ValidatedLineItem {
    /// Creates a validated line item from a catalog dish snapshot.
    pub fn from_dish(dish: &Dish, quantity: i64) -> Self {
        ValidatedLineItem {
            dish_id: dish.id,
            name: dish.name.clone(),
            unit_price: dish.price,
            quantity,
            line_total: dish.price.multiply_quantity(quantity),
            is_available: dish.is_available,
        }
    }
}

// =============================================================================
// Pricing Result
// =============================================================================

/// The authoritative price breakdown for one basket.
///
/// Value object: created and returned per pricing call, never persisted by
/// the engine. The caller decides whether to store it as part of an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    /// Sum of line totals at catalog prices, before any discount.
    pub subtotal: Money,

    /// Delivery fee after tiering and any free-delivery promo.
    pub delivery_fee: Money,

    /// Tax on the pre-discount subtotal. Promotions never reduce tax.
    pub tax_amount: Money,

    /// The rate used for `tax_amount`.
    pub tax_rate: TaxRate,

    /// Discount taken off the bill. Never exceeds `subtotal`.
    pub discount_amount: Money,

    /// `subtotal + delivery_fee + tax_amount - discount_amount`, clamped
    /// at zero.
    pub grand_total: Money,

    /// Whether a promo zeroed the delivery fee.
    pub free_delivery_applied: bool,

    /// The promo code that was applied, if any.
    pub promo_code_applied: Option<String>,

    /// ISO 4217 currency code.
    pub currency: String,

    /// The validated, priced line items.
    pub items: Vec<ValidatedLineItem>,

    /// Set when the grand total had to be clamped to zero. Should not occur
    /// under correct discount capping; the engine logs when it does.
    #[serde(skip)]
    pub total_clamped: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(850);
        assert_eq!(rate.bps(), 850);
        assert!((rate.as_fraction() - 0.085).abs() < 1e-9);
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        let rate = TaxRate::from_percentage(8.5);
        assert_eq!(rate.bps(), 850);
    }

    #[test]
    fn test_validated_line_item_snapshots_catalog_price() {
        let dish = Dish {
            id: 1,
            restaurant_id: 7,
            name: "Mansaf".to_string(),
            price: Money::from_minor(1200),
            is_available: true,
        };

        let item = ValidatedLineItem::from_dish(&dish, 2);
        assert_eq!(item.unit_price.minor(), 1200);
        assert_eq!(item.line_total.minor(), 2400);
        assert!(item.is_available);
    }

    #[test]
    fn test_promo_expiry() {
        let mut promo = sample_promo();
        let now = Utc::now();

        promo.expires_at = None;
        assert!(!promo.is_expired(now));

        promo.expires_at = Some(now + chrono::Duration::hours(1));
        assert!(!promo.is_expired(now));

        promo.expires_at = Some(now - chrono::Duration::hours(1));
        assert!(promo.is_expired(now));
    }

    #[test]
    fn test_promo_usage_headroom() {
        let mut promo = sample_promo();

        promo.usage_limit = None;
        promo.times_used = 1_000_000;
        assert!(promo.has_usage_headroom());

        promo.usage_limit = Some(5);
        promo.times_used = 4;
        assert!(promo.has_usage_headroom());

        promo.times_used = 5;
        assert!(!promo.has_usage_headroom());
    }

    #[test]
    fn test_discount_serde_is_tagged() {
        let json = serde_json::to_value(Discount::Percentage { bps: 1000 }).unwrap();
        assert_eq!(json["kind"], "percentage");

        let json = serde_json::to_value(Discount::Fixed {
            amount: Money::from_minor(500),
        })
        .unwrap();
        assert_eq!(json["kind"], "fixed");
        assert_eq!(json["amount"], 500);
    }

    fn sample_promo() -> Promo {
        Promo {
            code: "SAVE10".to_string(),
            discount: Discount::Percentage { bps: 1000 },
            free_delivery: true,
            minimum_order: Money::from_minor(4000),
            is_active: true,
            expires_at: None,
            usage_limit: None,
            times_used: 0,
            restaurant_scope: None,
        }
    }
}
