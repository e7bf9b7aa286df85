//! # In-Memory Stores
//!
//! HashMap-backed implementations of the store ports, for tests and for
//! embedding the engine without a database.
//!
//! ## Thread Safety
//! The catalog is immutable after construction, so reads need no lock. The
//! promo store wraps its map in a `Mutex` because `reserve_usage` mutates
//! the counter; holding the one lock across check-and-increment is what
//! makes the reservation atomic here.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use sufra_core::{Dish, Promo, Restaurant};

use crate::error::StoreError;
use crate::ports::{CatalogStore, PromoStore, UsageReservation};

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog store.
///
/// ## Usage
/// ```rust,ignore
/// let catalog = InMemoryCatalog::new()
///     .with_restaurant(restaurant)
///     .with_dish(dish);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    restaurants: HashMap<i64, Restaurant>,
    dishes: HashMap<i64, Dish>,
}

impl InMemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        InMemoryCatalog::default()
    }

    /// Adds a restaurant (builder style).
    pub fn with_restaurant(mut self, restaurant: Restaurant) -> Self {
        self.restaurants.insert(restaurant.id, restaurant);
        self
    }

    /// Adds a dish (builder style).
    pub fn with_dish(mut self, dish: Dish) -> Self {
        self.dishes.insert(dish.id, dish);
        self
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalog {
    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        Ok(self.restaurants.get(&id).cloned())
    }

    async fn dish(&self, id: i64) -> Result<Option<Dish>, StoreError> {
        Ok(self.dishes.get(&id).cloned())
    }
}

// =============================================================================
// Promotions
// =============================================================================

/// In-memory promotion store.
///
/// Codes are keyed lowercased so lookups are case-insensitive, matching the
/// SQLite store's NOCASE collation.
#[derive(Debug, Default)]
pub struct InMemoryPromoStore {
    promos: Mutex<HashMap<String, Promo>>,
}

impl InMemoryPromoStore {
    /// Creates an empty promo store.
    pub fn new() -> Self {
        InMemoryPromoStore::default()
    }

    /// Adds a promo (builder style).
    pub fn with_promo(self, promo: Promo) -> Self {
        {
            let mut promos = self.promos.lock().expect("promo store mutex poisoned");
            promos.insert(promo.code.to_lowercase(), promo);
        }
        self
    }

    /// Returns the current usage counter for a code, for test assertions.
    pub fn times_used(&self, code: &str) -> Option<i64> {
        let promos = self.promos.lock().expect("promo store mutex poisoned");
        promos.get(&code.to_lowercase()).map(|p| p.times_used)
    }
}

#[async_trait]
impl PromoStore for InMemoryPromoStore {
    async fn promo(&self, code: &str) -> Result<Option<Promo>, StoreError> {
        let promos = self.promos.lock().expect("promo store mutex poisoned");
        Ok(promos.get(&code.to_lowercase()).cloned())
    }

    async fn reserve_usage(&self, code: &str) -> Result<UsageReservation, StoreError> {
        let mut promos = self.promos.lock().expect("promo store mutex poisoned");

        let Some(promo) = promos.get_mut(&code.to_lowercase()) else {
            // Lost a race with promo deletion; same treatment as exhaustion.
            return Ok(UsageReservation::LimitExceeded);
        };

        // Check and increment under the one lock: this is the atomicity.
        if !promo.has_usage_headroom() {
            return Ok(UsageReservation::LimitExceeded);
        }

        promo.times_used += 1;
        Ok(UsageReservation::Reserved)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
