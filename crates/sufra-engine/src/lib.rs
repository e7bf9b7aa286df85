//! # sufra-engine: Stores and Orchestration for Sufra Pricing
//!
//! This crate wires the pure pricing rules in `sufra-core` to the outside
//! world: store ports, their SQLite and in-memory implementations, the
//! pricing engine itself, and the JSON wire types.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         sufra-engine                                     │
//! │                                                                         │
//! │  api        PricingRequest / PriceQuoteResponse (JSON boundary)         │
//! │  engine     PricingEngine<C, P> — one pricing call end to end           │
//! │  ports      CatalogStore + PromoStore async traits                      │
//! │  sqlite     production stores (sqlx, atomic usage reservation)          │
//! │  memory     in-memory stores (tests, embedding)                         │
//! │  db         pool creation, WAL config, embedded migrations              │
//! │  error      StoreError (retryable) / EngineError                        │
//! │                                                                         │
//! │  The engine mutates exactly one thing, ever: a promo usage counter,     │
//! │  and only through the store's atomic conditional increment.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("sufra.db")).await?;
//! let engine = PricingEngine::new(db.catalog(), db.promos(), PricingConfig::from_env());
//!
//! let outcome = engine.price(&request).await;
//! let response = PriceQuoteResponse::from_outcome(&outcome);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod db;
pub mod engine;
pub mod error;
pub mod memory;
pub mod ports;
pub mod sqlite;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use api::{PriceQuoteResponse, PricingRequest, PricingResultDto};
pub use db::{Database, DbConfig};
pub use engine::{PricedBasket, PricingEngine};
pub use error::{EngineError, EngineResult, StoreError};
pub use memory::{InMemoryCatalog, InMemoryPromoStore};
pub use ports::{CatalogStore, PromoStore, UsageReservation};
pub use sqlite::{SqliteCatalogStore, SqlitePromoStore};
