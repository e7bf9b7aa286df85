//! # Engine Error Types
//!
//! Error types for the store boundary and the pricing engine.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  SQLite Error (sqlx::Error)                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← retryable, the caller may try again        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  EngineError ← also wraps basket-level PricingError (not retryable)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PriceQuoteResponse envelope { success: false, errorMessage }          │
//! │                                                                         │
//! │  NOTE: promo skips never reach this module. They ride on SUCCESSFUL    │
//! │  results as a note.                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use sufra_core::PricingError;

// =============================================================================
// Store Error
// =============================================================================

/// Failures talking to the catalog or promotion store.
///
/// Always retryable from the caller's point of view: the engine performs no
/// partial mutation before the single usage-counter increment, so an
/// abandoned call leaves nothing to undo.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store cannot be reached (pool exhausted, connection lost).
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// A query failed at the store.
    #[error("Store query failed: {0}")]
    Query(String),
}

/// Convert sqlx errors to StoreError.
///
/// ## Error Mapping
/// ```text
/// sqlx::Error::PoolTimedOut / PoolClosed / Io  → StoreError::Unavailable
/// Other                                        → StoreError::Query
/// ```
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut => {
                StoreError::Unavailable("connection pool exhausted".to_string())
            }
            sqlx::Error::PoolClosed => StoreError::Unavailable("pool is closed".to_string()),
            sqlx::Error::Io(e) => StoreError::Unavailable(e.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Query(format!("migration failed: {}", err))
    }
}

// =============================================================================
// Engine Error
// =============================================================================

/// Everything a pricing call can fail with.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Basket-level rejection. Terminal: the request itself is not priceable.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A store was unreachable or a query failed. Transient: retry the call.
    #[error("Pricing temporarily unavailable, please retry: {0}")]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Whether the caller may retry the identical request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Store(_))
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

// =============================================================================
// Unit Tests
// =============================================================================
