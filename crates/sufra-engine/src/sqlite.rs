//! # SQLite Stores
//!
//! SQLite-backed implementations of the catalog and promotion store ports.
//!
//! ## The Usage-Counter Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve_usage("SAVE10")                                                │
//! │                                                                         │
//! │  UPDATE promos SET times_used = times_used + 1                          │
//! │  WHERE code = ?1                                                        │
//! │    AND (usage_limit IS NULL OR times_used < usage_limit)                │
//! │                                                                         │
//! │  rows_affected == 1  → Reserved                                         │
//! │  rows_affected == 0  → LimitExceeded (someone else got the last use)    │
//! │                                                                         │
//! │  One statement, guarded by the current counter value. There is no      │
//! │  window for a lost update: two racing checkouts serialize inside the   │
//! │  database, and the second one's guard fails.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The insert methods exist for seeding and tests; the pricing engine itself
//! never mutates catalog data.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use sufra_core::{Discount, Dish, Money, Promo, Restaurant};

use crate::error::StoreError;
use crate::ports::{CatalogStore, PromoStore, UsageReservation};

use async_trait::async_trait;

// =============================================================================
// Row Types
// =============================================================================

/// Raw restaurant row; mapped into the domain projection.
#[derive(Debug, sqlx::FromRow)]
struct RestaurantRow {
    id: i64,
    name: String,
    is_open: bool,
    base_delivery_fee_minor: i64,
}

impl From<RestaurantRow> for Restaurant {
    fn from(row: RestaurantRow) -> Self {
        Restaurant {
            id: row.id,
            name: row.name,
            is_open: row.is_open,
            base_delivery_fee: Money::from_minor(row.base_delivery_fee_minor),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct DishRow {
    id: i64,
    restaurant_id: i64,
    name: String,
    price_minor: i64,
    is_available: bool,
}

impl From<DishRow> for Dish {
    fn from(row: DishRow) -> Self {
        Dish {
            id: row.id,
            restaurant_id: row.restaurant_id,
            name: row.name,
            price: Money::from_minor(row.price_minor),
            is_available: row.is_available,
        }
    }
}

/// Raw promo row. The two nullable discount columns collapse into the tagged
/// [`Discount`] variant here, at the storage boundary; nothing downstream
/// ever sees the nullable-pair representation.
#[derive(Debug, sqlx::FromRow)]
struct PromoRow {
    code: String,
    discount_kind: String,
    discount_bps: Option<i64>,
    discount_amount_minor: Option<i64>,
    free_delivery: bool,
    minimum_order_minor: i64,
    is_active: bool,
    expires_at: Option<DateTime<Utc>>,
    usage_limit: Option<i64>,
    times_used: i64,
    restaurant_scope: Option<i64>,
}

impl From<PromoRow> for Promo {
    fn from(row: PromoRow) -> Self {
        let discount = match row.discount_kind.as_str() {
            "percentage" => Discount::Percentage {
                bps: row.discount_bps.unwrap_or(0) as u32,
            },
            "fixed" => Discount::Fixed {
                amount: Money::from_minor(row.discount_amount_minor.unwrap_or(0)),
            },
            _ => Discount::None,
        };

        Promo {
            code: row.code,
            discount,
            free_delivery: row.free_delivery,
            minimum_order: Money::from_minor(row.minimum_order_minor),
            is_active: row.is_active,
            expires_at: row.expires_at,
            usage_limit: row.usage_limit,
            times_used: row.times_used,
            restaurant_scope: row.restaurant_scope,
        }
    }
}

/// Splits a [`Discount`] into its storage columns.
fn discount_columns(discount: &Discount) -> (&'static str, Option<i64>, Option<i64>) {
    match discount {
        Discount::None => ("none", None, None),
        Discount::Percentage { bps } => ("percentage", Some(*bps as i64), None),
        Discount::Fixed { amount } => ("fixed", None, Some(amount.minor())),
    }
}

// =============================================================================
// Catalog Store
// =============================================================================

/// SQLite-backed catalog store.
#[derive(Debug, Clone)]
pub struct SqliteCatalogStore {
    pool: SqlitePool,
}

impl SqliteCatalogStore {
    /// Creates a new SqliteCatalogStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqliteCatalogStore { pool }
    }

    /// Inserts a restaurant. Admin/seed tooling only.
    pub async fn insert_restaurant(&self, restaurant: &Restaurant) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO restaurants (id, name, is_open, base_delivery_fee_minor) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(restaurant.id)
        .bind(&restaurant.name)
        .bind(restaurant.is_open)
        .bind(restaurant.base_delivery_fee.minor())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Inserts a dish. Admin/seed tooling only.
    pub async fn insert_dish(&self, dish: &Dish) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO dishes (id, restaurant_id, name, price_minor, is_available) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(dish.id)
        .bind(dish.restaurant_id)
        .bind(&dish.name)
        .bind(dish.price.minor())
        .bind(dish.is_available)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CatalogStore for SqliteCatalogStore {
    async fn restaurant(&self, id: i64) -> Result<Option<Restaurant>, StoreError> {
        debug!(id, "Fetching restaurant");

        let row = sqlx::query_as::<_, RestaurantRow>(
            "SELECT id, name, is_open, base_delivery_fee_minor \
             FROM restaurants WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Restaurant::from))
    }

    async fn dish(&self, id: i64) -> Result<Option<Dish>, StoreError> {
        debug!(id, "Fetching dish");

        let row = sqlx::query_as::<_, DishRow>(
            "SELECT id, restaurant_id, name, price_minor, is_available \
             FROM dishes WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Dish::from))
    }
}

// =============================================================================
// Promo Store
// =============================================================================

/// SQLite-backed promotion store.
#[derive(Debug, Clone)]
pub struct SqlitePromoStore {
    pool: SqlitePool,
}

impl SqlitePromoStore {
    /// Creates a new SqlitePromoStore.
    pub fn new(pool: SqlitePool) -> Self {
        SqlitePromoStore { pool }
    }

    /// Inserts a promo. Admin/seed tooling only.
    pub async fn insert_promo(&self, promo: &Promo) -> Result<(), StoreError> {
        let (kind, bps, amount_minor) = discount_columns(&promo.discount);

        sqlx::query(
            "INSERT INTO promos ( \
                code, discount_kind, discount_bps, discount_amount_minor, \
                free_delivery, minimum_order_minor, is_active, expires_at, \
                usage_limit, times_used, restaurant_scope \
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        )
        .bind(&promo.code)
        .bind(kind)
        .bind(bps)
        .bind(amount_minor)
        .bind(promo.free_delivery)
        .bind(promo.minimum_order.minor())
        .bind(promo.is_active)
        .bind(promo.expires_at)
        .bind(promo.usage_limit)
        .bind(promo.times_used)
        .bind(promo.restaurant_scope)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Returns the current usage counter for a code, for test assertions.
    pub async fn times_used(&self, code: &str) -> Result<Option<i64>, StoreError> {
        let count: Option<i64> =
            sqlx::query_scalar("SELECT times_used FROM promos WHERE code = ?1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(count)
    }
}

#[async_trait]
impl PromoStore for SqlitePromoStore {
    async fn promo(&self, code: &str) -> Result<Option<Promo>, StoreError> {
        debug!(code, "Fetching promo");

        // The code column collates NOCASE, so equality is case-insensitive.
        let row = sqlx::query_as::<_, PromoRow>(
            "SELECT code, discount_kind, discount_bps, discount_amount_minor, \
                    free_delivery, minimum_order_minor, is_active, expires_at, \
                    usage_limit, times_used, restaurant_scope \
             FROM promos WHERE code = ?1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Promo::from))
    }

    async fn reserve_usage(&self, code: &str) -> Result<UsageReservation, StoreError> {
        // Single conditional UPDATE: the guard re-reads times_used inside the
        // statement, so concurrent redemptions can never exceed the limit.
        let result = sqlx::query(
            "UPDATE promos SET times_used = times_used + 1 \
             WHERE code = ?1 \
               AND (usage_limit IS NULL OR times_used < usage_limit)",
        )
        .bind(code)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 1 {
            debug!(code, "Promo usage reserved");
            Ok(UsageReservation::Reserved)
        } else {
            debug!(code, "Promo usage reservation lost");
            Ok(UsageReservation::LimitExceeded)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
