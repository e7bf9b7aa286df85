//! # sufra-core: Pure Pricing Logic for Sufra
//!
//! This crate is the **heart** of the Sufra order pricing engine. It contains
//! all pricing rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sufra Pricing Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Caller (checkout / cart preview)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ PricingRequest                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    sufra-engine                                  │   │
//! │  │    store ports, SQLite/in-memory stores, orchestration          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ sufra-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌────────┐ ┌────────┐ ┌──────────┐ ┌───────┐ ┌────────┐      │   │
//! │  │   │ money  │ │ basket │ │ delivery │ │ promo │ │ totals │      │   │
//! │  │   └────────┘ └────────┘ └──────────┘ └───────┘ └────────┘      │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK READS • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Restaurant, Dish, Promo, PricingResult, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`config`] - Injected thresholds, fees and rates
//! - [`error`] - Basket rejections and soft promo skips
//! - [`basket`] - Basket validation against a catalog snapshot
//! - [`delivery`] - Tiered delivery-fee policy
//! - [`promo`] - Promo eligibility and discount computation
//! - [`totals`] - Final assembly with the non-negativity invariant
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: every function is deterministic, time is a parameter
//! 2. **No I/O**: database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: all monetary values are minor units (i64)
//! 4. **Explicit Errors**: typed variants, never strings or panics
//! 5. **One source of truth**: cart preview and order creation share this math

// =============================================================================
// Module Declarations
// =============================================================================

pub mod basket;
pub mod config;
pub mod delivery;
pub mod error;
pub mod money;
pub mod promo;
pub mod totals;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use sufra_core::Money` instead of
// `use sufra_core::money::Money`

pub use config::PricingConfig;
pub use error::{PricingError, PricingOutcome, PromoSkip};
pub use money::Money;
pub use types::*;
