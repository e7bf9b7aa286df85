//! # Error Types
//!
//! Domain-specific error types for sufra-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sufra-core errors (this file)                                          │
//! │  ├── PricingError  - basket-level rejections (terminal for the call)   │
//! │  └── PromoSkip     - promo inapplicability (soft, never terminal)      │
//! │                                                                         │
//! │  sufra-engine errors (separate crate)                                   │
//! │  ├── StoreError    - store unreachable / query failures (retryable)    │
//! │  └── EngineError   - wraps PricingError and StoreError                 │
//! │                                                                         │
//! │  Flow: PricingError → EngineError → response envelope → caller         │
//! │        PromoSkip    → note on a SUCCESSFUL result, never an error      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (ids, quantities, amounts)
//! 3. Errors are enum variants, never String
//! 4. A promo that cannot apply is not an error: pricing proceeds without it

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Pricing Error
// =============================================================================

/// Basket-level pricing rejections.
///
/// Every variant is terminal for the pricing call: the caller gets a
/// structured failure and no partial price breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// The requested restaurant does not exist in the catalog.
    #[error("Restaurant not found: {id}")]
    RestaurantNotFound { id: i64 },

    /// The restaurant exists but is not accepting orders.
    #[error("Restaurant '{name}' is currently closed")]
    RestaurantClosed { name: String },

    /// The basket has no line items.
    #[error("Basket is empty")]
    EmptyBasket,

    /// A requested dish does not exist in the catalog.
    #[error("Dish not found: {dish_id}")]
    DishNotFound { dish_id: i64 },

    /// The dish exists but belongs to a different restaurant.
    #[error("Dish {dish_id} is not on the menu of restaurant {restaurant_id}")]
    DishNotOnMenu { dish_id: i64, restaurant_id: i64 },

    /// The dish is currently unavailable.
    #[error("Dish '{name}' is currently unavailable")]
    DishUnavailable { name: String },

    /// Quantity outside the allowed range.
    #[error("Invalid quantity {quantity} for dish {dish_id}: must be between 1 and {max}")]
    InvalidQuantity {
        dish_id: i64,
        quantity: i64,
        max: i64,
    },
}

// =============================================================================
// Promo Skip
// =============================================================================

/// Reasons a promo code did not apply.
///
/// Soft by design: a skipped promo downgrades the call to "no discount",
/// it never aborts pricing. The message is surfaced verbatim as the note
/// on an otherwise successful result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromoSkip {
    /// No active promo with this code.
    #[error("Promo code '{code}' was not found")]
    NotFound { code: String },

    /// The promo exists but is disabled.
    #[error("Promo code '{code}' is no longer active")]
    Inactive { code: String },

    /// The promo expired before this call.
    #[error("Promo code '{code}' has expired")]
    Expired { code: String },

    /// All redemptions are used up.
    #[error("Promo code '{code}' has reached its usage limit")]
    UsageLimitReached { code: String },

    /// The basket subtotal is below the promo's minimum order amount.
    #[error("Promo code '{code}' requires a minimum order of {required}, basket is {subtotal}")]
    BelowMinimum {
        code: String,
        required: Money,
        subtotal: Money,
    },

    /// The promo is scoped to a different restaurant.
    #[error("Promo code '{code}' is not valid for this restaurant")]
    WrongRestaurant { code: String },

    /// Another checkout claimed the last redemption between our eligibility
    /// check and the usage reservation.
    #[error("Promo code '{code}' was just fully redeemed, no uses remain")]
    RedemptionRaceLost { code: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with PricingError.
pub type PricingOutcome<T> = Result<T, PricingError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_error_messages() {
        let err = PricingError::InvalidQuantity {
            dish_id: 3,
            quantity: 11,
            max: 10,
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 11 for dish 3: must be between 1 and 10"
        );

        let err = PricingError::DishNotOnMenu {
            dish_id: 4,
            restaurant_id: 9,
        };
        assert_eq!(
            err.to_string(),
            "Dish 4 is not on the menu of restaurant 9"
        );
    }

    #[test]
    fn test_promo_skip_messages() {
        let skip = PromoSkip::BelowMinimum {
            code: "SAVE10".to_string(),
            required: Money::from_minor(4000),
            subtotal: Money::from_minor(2400),
        };
        assert_eq!(
            skip.to_string(),
            "Promo code 'SAVE10' requires a minimum order of 40.00, basket is 24.00"
        );
    }
}
