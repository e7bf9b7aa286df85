//! # Pricing Engine
//!
//! Orchestrates one pricing call end to end over the store ports.
//!
//! ## Control Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price(request)                                                         │
//! │                                                                         │
//! │  1. fetch restaurant            ── absent ──► RestaurantNotFound       │
//! │  2. prefetch dish snapshots                                             │
//! │  3. validate basket (sufra-core) ── reject ──► structured failure       │
//! │  4. delivery fee + tax, both from the pre-discount subtotal            │
//! │  5. resolve promo:                                                      │
//! │       lookup → eligibility → ATOMIC usage reservation                   │
//! │       any miss downgrades to a note, pricing continues                  │
//! │  6. assemble totals (clamped >= 0)                                      │
//! │                                                                         │
//! │  The engine is stateless: every call is an independent computation,    │
//! │  and the single usage-counter increment is the only write it ever      │
//! │  issues, after all validation has passed.                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, warn};

use sufra_core::promo::PromoApplication;
use sufra_core::totals::TotalsInput;
use sufra_core::{basket, delivery, promo, Money, PricingConfig, PricingError, PricingResult,
    PromoSkip};

use crate::api::PricingRequest;
use crate::error::{EngineResult, StoreError};
use crate::ports::{CatalogStore, PromoStore, UsageReservation};

/// A successfully priced basket.
///
/// Carries the authoritative breakdown plus, when a promo code was submitted
/// but could not apply, the human-readable reason. A present note does NOT
/// mean failure: the breakdown is complete and valid without the promo.
#[derive(Debug, Clone)]
pub struct PricedBasket {
    /// The price breakdown.
    pub result: PricingResult,

    /// Why the submitted promo did not apply, if it didn't.
    pub promo_note: Option<String>,
}

/// The order pricing engine.
///
/// Generic over the two store ports so production (SQLite) and tests
/// (in-memory) share the exact same orchestration. Holds no mutable state;
/// concurrent calls need no coordination beyond what the promo store's
/// atomic reservation provides.
#[derive(Debug)]
pub struct PricingEngine<C, P> {
    catalog: C,
    promos: P,
    config: PricingConfig,
}

impl<C: CatalogStore, P: PromoStore> PricingEngine<C, P> {
    /// Creates a new engine over the given stores and configuration.
    pub fn new(catalog: C, promos: P, config: PricingConfig) -> Self {
        PricingEngine {
            catalog,
            promos,
            config,
        }
    }

    /// Returns the injected configuration.
    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Prices one basket.
    ///
    /// ## Errors
    /// - [`PricingError`] variants for basket-level rejections (terminal)
    /// - [`StoreError`] when a store is unreachable (retryable)
    ///
    /// Promo problems are never errors; they surface as `promo_note`.
    pub async fn price(&self, request: &PricingRequest) -> EngineResult<PricedBasket> {
        debug!(
            restaurant_id = request.restaurant_id,
            items = request.items.len(),
            promo = request.promo_code.as_deref().unwrap_or("-"),
            "Pricing basket"
        );

        let restaurant = self
            .catalog
            .restaurant(request.restaurant_id)
            .await?
            .ok_or(PricingError::RestaurantNotFound {
                id: request.restaurant_id,
            })?;

        // Snapshot every referenced dish once; validation decides what a
        // missing entry means.
        let mut dishes = HashMap::new();
        for item in &request.items {
            if dishes.contains_key(&item.dish_id) {
                continue;
            }
            if let Some(dish) = self.catalog.dish(item.dish_id).await? {
                dishes.insert(item.dish_id, dish);
            }
        }

        let (items, subtotal) =
            basket::validate_basket(&restaurant, &request.items, &dishes, &self.config)?;

        // Delivery fee and tax are independent of each other and of the
        // promo: both are computed from the pre-discount subtotal.
        let tiered_fee = delivery::delivery_fee(subtotal, restaurant.base_delivery_fee, &self.config);
        let tax_amount = subtotal.calculate_tax(self.config.tax_rate);

        let (application, promo_note) = match request.promo_code.as_deref() {
            None => (None, None),
            Some(code) => match self.resolve_promo(code, subtotal, restaurant.id).await? {
                Ok(application) => (Some(application), None),
                Err(skip) => {
                    debug!(%skip, "Promo not applied");
                    (None, Some(skip.to_string()))
                }
            },
        };

        let free_delivery_applied = application.as_ref().is_some_and(|a| a.free_delivery);
        let delivery_fee = if free_delivery_applied {
            Money::zero()
        } else {
            tiered_fee
        };
        let discount_amount = application
            .as_ref()
            .map_or(Money::zero(), |a| a.discount_amount);
        let promo_code_applied = application.map(|a| a.code);

        let result = sufra_core::totals::assemble(
            TotalsInput {
                subtotal,
                delivery_fee,
                tax_amount,
                discount_amount,
                free_delivery_applied,
                promo_code_applied,
                items,
            },
            &self.config,
        );

        if result.total_clamped {
            warn!(
                subtotal = %result.subtotal,
                discount = %result.discount_amount,
                "Grand total clamped to zero; discount capping should prevent this"
            );
        }

        info!(
            restaurant_id = restaurant.id,
            subtotal = %result.subtotal,
            grand_total = %result.grand_total,
            promo = result.promo_code_applied.as_deref().unwrap_or("-"),
            "Basket priced"
        );

        Ok(PricedBasket { result, promo_note })
    }

    /// Resolves a promo code against the basket.
    ///
    /// The outer `Result` is a store failure (retryable); the inner one is
    /// the promo decision. Reservation happens last, only after every
    /// eligibility rule has passed, so an ineligible call never consumes
    /// a use.
    async fn resolve_promo(
        &self,
        code: &str,
        subtotal: Money,
        restaurant_id: i64,
    ) -> Result<Result<PromoApplication, PromoSkip>, StoreError> {
        let Some(record) = self.promos.promo(code).await? else {
            return Ok(Err(PromoSkip::NotFound {
                code: code.to_string(),
            }));
        };

        if let Err(skip) = promo::check_eligibility(&record, subtotal, restaurant_id, Utc::now()) {
            return Ok(Err(skip));
        }

        match self.promos.reserve_usage(&record.code).await? {
            UsageReservation::Reserved => Ok(Ok(PromoApplication {
                code: record.code.clone(),
                free_delivery: record.free_delivery,
                discount_amount: promo::discount_amount(&record.discount, subtotal),
            })),
            // Someone else claimed the last use between our eligibility
            // check and the reservation. Soft, like every other skip.
            UsageReservation::LimitExceeded => Ok(Err(PromoSkip::RedemptionRaceLost {
                code: record.code.clone(),
            })),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Duration;

    use sufra_core::{Discount, Dish, LineItemRequest, Promo, Restaurant};

    use crate::error::EngineError;
    use crate::memory::{InMemoryCatalog, InMemoryPromoStore};

    fn restaurant(id: i64, is_open: bool, base_fee: i64) -> Restaurant {
        Restaurant {
            id,
            name: format!("Restaurant {}", id),
            is_open,
            base_delivery_fee: Money::from_minor(base_fee),
        }
    }

    fn dish(id: i64, restaurant_id: i64, price: i64) -> Dish {
        Dish {
            id,
            restaurant_id,
            name: format!("Dish {}", id),
            price: Money::from_minor(price),
            is_available: true,
        }
    }

    fn promo(code: &str) -> Promo {
        Promo {
            code: code.to_string(),
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

    fn request(restaurant_id: i64, items: &[(i64, i64)], code: Option<&str>) -> PricingRequest {
        PricingRequest {
            restaurant_id,
            items: items
                .iter()
                .map(|&(dish_id, quantity)| LineItemRequest { dish_id, quantity })
                .collect(),
            promo_code: code.map(str::to_string),
            delivery_address_id: None,
        }
    }

    fn engine(
        catalog: InMemoryCatalog,
        promos: InMemoryPromoStore,
    ) -> PricingEngine<InMemoryCatalog, InMemoryPromoStore> {
        PricingEngine::new(catalog, promos, PricingConfig::default())
    }

    #[tokio::test]
    async fn test_standard_basket_breakdown() {
        // 12.00 x 2 at a restaurant charging 2.50 delivery:
        //   subtotal 24.00, low tier floor max(2.99, 2.50) = 2.99,
        //   tax 24.00 * 8.5% = 2.04, total 29.03
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let priced = engine.price(&request(7, &[(1, 2)], None)).await.unwrap();
        let result = &priced.result;

        assert_eq!(result.subtotal.minor(), 2400);
        assert_eq!(result.delivery_fee.minor(), 299);
        assert_eq!(result.tax_amount.minor(), 204);
        assert_eq!(result.grand_total.minor(), 2903);
        assert!(result.discount_amount.is_zero());
        assert!(result.promo_code_applied.is_none());
        assert!(priced.promo_note.is_none());
        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].line_total.minor(), 2400);
    }

    #[tokio::test]
    async fn test_promo_with_free_delivery_and_percentage() {
        // 27.50 x 2 = 55.00, SAVE10 (10%, free delivery, min 40.00):
        //   fee 0, tax on pre-discount 55.00 = 4.68 (467.5 rounds up),
        //   discount 5.50, total 55.00 + 0 + 4.68 - 5.50 = 54.18
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 2750));
        let promos = InMemoryPromoStore::new().with_promo(promo("SAVE10"));
        let engine = engine(catalog, promos);

        let priced = engine
            .price(&request(7, &[(1, 2)], Some("SAVE10")))
            .await
            .unwrap();
        let result = &priced.result;

        assert_eq!(result.subtotal.minor(), 5500);
        assert!(result.free_delivery_applied);
        assert!(result.delivery_fee.is_zero());
        assert_eq!(result.tax_amount.minor(), 468);
        assert_eq!(result.discount_amount.minor(), 550);
        assert_eq!(result.grand_total.minor(), 5418);
        assert_eq!(result.promo_code_applied.as_deref(), Some("SAVE10"));
        assert!(priced.promo_note.is_none());
    }

    #[tokio::test]
    async fn test_promo_code_matching_is_case_insensitive() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 2750));
        let promos = InMemoryPromoStore::new().with_promo(promo("SAVE10"));
        let engine = engine(catalog, promos);

        let priced = engine
            .price(&request(7, &[(1, 2)], Some("save10")))
            .await
            .unwrap();

        // Applied code is reported as stored, not as typed.
        assert_eq!(priced.result.promo_code_applied.as_deref(), Some("SAVE10"));
    }

    #[tokio::test]
    async fn test_unknown_restaurant_rejected() {
        let engine = engine(InMemoryCatalog::new(), InMemoryPromoStore::new());

        let err = engine.price(&request(99, &[(1, 1)], None)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pricing(PricingError::RestaurantNotFound { id: 99 })
        ));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_closed_restaurant_rejected() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, false, 250))
            .with_dish(dish(1, 7, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let err = engine.price(&request(7, &[(1, 1)], None)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pricing(PricingError::RestaurantClosed { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_basket_rejected() {
        let catalog = InMemoryCatalog::new().with_restaurant(restaurant(7, true, 250));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let err = engine.price(&request(7, &[], None)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pricing(PricingError::EmptyBasket)
        ));
    }

    #[tokio::test]
    async fn test_dish_from_other_restaurant_rejected() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 8, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let err = engine.price(&request(7, &[(1, 1)], None)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pricing(PricingError::DishNotOnMenu {
                dish_id: 1,
                restaurant_id: 7
            })
        ));
    }

    #[tokio::test]
    async fn test_quantity_above_max_rejected() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let err = engine.price(&request(7, &[(1, 11)], None)).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pricing(PricingError::InvalidQuantity {
                quantity: 11,
                max: 10,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_expired_promo_prices_without_discount() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 2750));

        let mut expired = promo("OLD");
        expired.expires_at = Some(Utc::now() - Duration::days(1));
        let promos = Arc::new(InMemoryPromoStore::new().with_promo(expired));

        let engine = PricingEngine::new(catalog, Arc::clone(&promos), PricingConfig::default());
        let priced = engine
            .price(&request(7, &[(1, 2)], Some("OLD")))
            .await
            .unwrap();

        // Priced as if no code was submitted, with the reason attached.
        assert!(priced.result.promo_code_applied.is_none());
        assert!(priced.result.discount_amount.is_zero());
        assert!(!priced.result.free_delivery_applied);
        assert_eq!(
            priced.promo_note.as_deref(),
            Some("Promo code 'OLD' has expired")
        );

        // An ineligible promo never consumes a use.
        assert_eq!(promos.times_used("OLD"), Some(0));
    }

    #[tokio::test]
    async fn test_below_minimum_promo_notes_amounts() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 1200));
        let promos = InMemoryPromoStore::new().with_promo(promo("SAVE10"));
        let engine = engine(catalog, promos);

        let priced = engine
            .price(&request(7, &[(1, 2)], Some("SAVE10")))
            .await
            .unwrap();

        assert!(priced.result.promo_code_applied.is_none());
        assert_eq!(
            priced.promo_note.as_deref(),
            Some("Promo code 'SAVE10' requires a minimum order of 40.00, basket is 24.00")
        );
    }

    #[tokio::test]
    async fn test_wrong_restaurant_scope_noted() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(8, true, 250))
            .with_dish(dish(1, 8, 2750));

        let mut scoped = promo("SCOPED");
        scoped.restaurant_scope = Some(7);
        let promos = InMemoryPromoStore::new().with_promo(scoped);
        let engine = engine(catalog, promos);

        let priced = engine
            .price(&request(8, &[(1, 2)], Some("SCOPED")))
            .await
            .unwrap();

        assert!(priced.result.promo_code_applied.is_none());
        assert_eq!(
            priced.promo_note.as_deref(),
            Some("Promo code 'SCOPED' is not valid for this restaurant")
        );
    }

    #[tokio::test]
    async fn test_unknown_promo_code_noted() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let priced = engine
            .price(&request(7, &[(1, 2)], Some("NOPE")))
            .await
            .unwrap();

        assert_eq!(
            priced.promo_note.as_deref(),
            Some("Promo code 'NOPE' was not found")
        );
        assert_eq!(priced.result.grand_total.minor(), 2903);
    }

    #[tokio::test]
    async fn test_fixed_discount_capped_at_subtotal() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 750));

        let mut flat = promo("FLAT10");
        flat.discount = Discount::Fixed {
            amount: Money::from_minor(1000),
        };
        flat.free_delivery = false;
        flat.minimum_order = Money::zero();
        let promos = InMemoryPromoStore::new().with_promo(flat);
        let engine = engine(catalog, promos);

        let priced = engine
            .price(&request(7, &[(1, 1)], Some("FLAT10")))
            .await
            .unwrap();
        let result = &priced.result;

        // Discount capped at the 7.50 subtotal; fee and tax still owed,
        // so the total stays positive without any clamping.
        assert_eq!(result.discount_amount.minor(), 750);
        assert_eq!(result.delivery_fee.minor(), 299);
        assert_eq!(result.tax_amount.minor(), 64);
        assert_eq!(result.grand_total.minor(), 363);
        assert!(!result.total_clamped);
    }

    #[tokio::test]
    async fn test_delivery_tier_boundaries_through_engine() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 2999))
            .with_dish(dish(2, 7, 3000))
            .with_dish(dish(3, 7, 5000));
        let engine = engine(catalog, InMemoryPromoStore::new());

        // 29.99: low tier, floor applies.
        let priced = engine.price(&request(7, &[(1, 1)], None)).await.unwrap();
        assert_eq!(priced.result.delivery_fee.minor(), 299);

        // 30.00: reduced tier, capped at 1.99.
        let priced = engine.price(&request(7, &[(2, 1)], None)).await.unwrap();
        assert_eq!(priced.result.delivery_fee.minor(), 199);

        // 50.00: free.
        let priced = engine.price(&request(7, &[(3, 1)], None)).await.unwrap();
        assert!(priced.result.delivery_fee.is_zero());
    }

    #[tokio::test]
    async fn test_usage_limit_holds_under_concurrency() {
        // 20 checkouts race for a promo with 5 uses left: exactly 5 win,
        // the other 15 get a priced basket without the discount, and the
        // counter lands exactly on the limit.
        let catalog = Arc::new(
            InMemoryCatalog::new()
                .with_restaurant(restaurant(7, true, 250))
                .with_dish(dish(1, 7, 2750)),
        );

        let mut limited = promo("LAST5");
        limited.usage_limit = Some(5);
        let promos = Arc::new(InMemoryPromoStore::new().with_promo(limited));

        let engine = Arc::new(PricingEngine::new(
            Arc::clone(&catalog),
            Arc::clone(&promos),
            PricingConfig::default(),
        ));

        let mut handles = Vec::new();
        for _ in 0..20 {
            let engine = Arc::clone(&engine);
            handles.push(tokio::spawn(async move {
                engine.price(&request(7, &[(1, 2)], Some("LAST5"))).await
            }));
        }

        let mut applied = 0;
        let mut skipped = 0;
        for handle in handles {
            let priced = handle.await.unwrap().unwrap();
            if priced.result.promo_code_applied.is_some() {
                applied += 1;
            } else {
                assert!(priced.promo_note.is_some());
                skipped += 1;
            }
        }

        assert_eq!(applied, 5);
        assert_eq!(skipped, 15);
        assert_eq!(promos.times_used("LAST5"), Some(5));
    }

    #[tokio::test]
    async fn test_duplicate_dish_lines_price_independently() {
        let catalog = InMemoryCatalog::new()
            .with_restaurant(restaurant(7, true, 250))
            .with_dish(dish(1, 7, 1200));
        let engine = engine(catalog, InMemoryPromoStore::new());

        let priced = engine
            .price(&request(7, &[(1, 2), (1, 3)], None))
            .await
            .unwrap();

        assert_eq!(priced.result.items.len(), 2);
        assert_eq!(priced.result.subtotal.minor(), 6000);
    }
}
