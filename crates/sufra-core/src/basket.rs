//! # Basket Validation
//!
//! Turns an untrusted basket request into validated, catalog-priced line
//! items, or rejects it.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  validate_basket(restaurant, requests, dishes, config)                  │
//! │                                                                         │
//! │  1. restaurant.is_open?          ── no ──► RestaurantClosed            │
//! │  2. requests non-empty?          ── no ──► EmptyBasket                 │
//! │  3. per item, in request order:                                         │
//! │     dish in snapshot?            ── no ──► DishNotFound                │
//! │     dish.restaurant_id matches?  ── no ──► DishNotOnMenu               │
//! │     dish.is_available?           ── no ──► DishUnavailable             │
//! │     1 <= qty <= max?             ── no ──► InvalidQuantity             │
//! │                                                                         │
//! │  Fail fast: the first violation aborts, no partial results returned.   │
//! │                                                                         │
//! │  4. subtotal = Σ catalog_price × quantity                               │
//! │     The request carries no prices; the catalog snapshot is the only    │
//! │     source. This is the core anti-tampering control.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Restaurant existence is checked by the engine at fetch time
//! (`RestaurantNotFound`); by the time this function runs, a restaurant
//! projection is in hand.

use std::collections::HashMap;

use crate::config::PricingConfig;
use crate::error::{PricingError, PricingOutcome};
use crate::money::Money;
use crate::types::{Dish, LineItemRequest, Restaurant, ValidatedLineItem};

/// Validates a basket against a catalog snapshot and prices it.
///
/// ## Arguments
/// * `restaurant` - catalog projection of the target restaurant
/// * `requests` - the caller's line items, untrusted
/// * `dishes` - catalog snapshot of every dish id the caller referenced;
///   missing entries surface as `DishNotFound`
/// * `config` - quantity bounds
///
/// ## Returns
/// The validated line items in request order plus the subtotal, or the
/// first violation encountered.
pub fn validate_basket(
    restaurant: &Restaurant,
    requests: &[LineItemRequest],
    dishes: &HashMap<i64, Dish>,
    config: &PricingConfig,
) -> PricingOutcome<(Vec<ValidatedLineItem>, Money)> {
    if !restaurant.is_open {
        return Err(PricingError::RestaurantClosed {
            name: restaurant.name.clone(),
        });
    }

    if requests.is_empty() {
        return Err(PricingError::EmptyBasket);
    }

    let mut items = Vec::with_capacity(requests.len());
    let mut subtotal = Money::zero();

    for request in requests {
        let dish = dishes
            .get(&request.dish_id)
            .ok_or(PricingError::DishNotFound {
                dish_id: request.dish_id,
            })?;

        if dish.restaurant_id != restaurant.id {
            return Err(PricingError::DishNotOnMenu {
                dish_id: dish.id,
                restaurant_id: restaurant.id,
            });
        }

        if !dish.is_available {
            return Err(PricingError::DishUnavailable {
                name: dish.name.clone(),
            });
        }

        if request.quantity < 1 || request.quantity > config.max_item_quantity {
            return Err(PricingError::InvalidQuantity {
                dish_id: dish.id,
                quantity: request.quantity,
                max: config.max_item_quantity,
            });
        }

        let item = ValidatedLineItem::from_dish(dish, request.quantity);
        subtotal += item.line_total;
        items.push(item);
    }

    Ok((items, subtotal))
}

// =============================================================================
// Unit Tests
// =============================================================================
