//! # Store Ports
//!
//! Async trait boundaries between the pricing engine and its two external
//! collaborators: the catalog store and the promotion store. The engine is
//! generic over these, so tests run against in-memory stores and production
//! runs against SQLite without touching the orchestration.
//!
//! ## The One Shared-Mutable Hazard
//! The promo `times_used` counter is the only durable state this engine ever
//! writes. [`PromoStore::reserve_usage`] is therefore specified as an atomic
//! conditional increment: implementations must never read-modify-write the
//! counter at the application layer, or concurrent checkouts lose updates
//! and push a code past its limit.

use async_trait::async_trait;

use sufra_core::{Dish, Promo, Restaurant};

use crate::error::StoreError;

/// Outcome of a usage reservation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageReservation {
    /// One use was claimed; the promo may be applied to this basket.
    Reserved,
    /// The limit was already reached (possibly by a concurrent checkout
    /// between the eligibility check and this call).
    LimitExceeded,
}

/// Read-only source of restaurant and dish projections.
///
/// The engine never mutates catalog data.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Looks up a restaurant by id.
    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError>;

    /// Looks up a dish by id.
    async fn dish(&self, id: i64) -> Result<Option<Dish>, StoreError>;
}

/// Source of promo-code records and their usage counters.
#[async_trait]
pub trait PromoStore: Send + Sync {
    /// Looks up a promo by code, case-insensitively. Returns the record
    /// whether or not it is active; eligibility rules decide what to do
    /// with it (and produce a more specific skip reason than "not found").
    async fn promo(&self, code: &str) -> Result<Option<Promo>, StoreError>;

    /// Atomically claims one use of the promo, guarded by its usage limit.
    ///
    /// MUST be a single conditional operation (one SQL UPDATE, one lock
    /// scope). `times_used` may never exceed `usage_limit`, no matter how
    /// many reservations race.
    async fn reserve_usage(&self, code: &str) -> Result<UsageReservation, StoreError>;
}

// Blanket impls so a store can be shared (e.g. Arc'd between an engine and
// a test asserting on the usage counter) without a newtype.

#[async_trait]
impl<T: CatalogStore + ?Sized> CatalogStore for std::sync::Arc<T> {
    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        (**self).restaurant(id).await
    }

    async fn dish(&self, id: i64) -> Result<Option<Dish>, StoreError> {
        (**self).dish(id).await
    }
}

#[async_trait]
impl<T: PromoStore + ?Sized> PromoStore for std::sync::Arc<T> {
    async fn promo(&self, code: &str) -> Result<Option<Promo>, StoreError> {
        (**self).promo(code).await
    }

    async fn reserve_usage(&self, code: &str) -> Result<UsageReservation, StoreError> {
        (**self).reserve_usage(code).await
    }
}
