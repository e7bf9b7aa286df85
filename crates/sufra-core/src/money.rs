//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A basket that is 29.029999999 instead of 29.03 fails reconciliation   │
//! │  and opens the door to off-by-a-qirsh disputes on every checkout.      │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Minor Units                                      │
//! │    24.00 JOD = 2400 qirsh. Every computation is exact integer math;    │
//! │    the single rounding step (tax, percentage discounts) is explicit    │
//! │    and uses round-half-away-from-zero at the minor unit.               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sufra_core::money::Money;
//!
//! // Create from minor units (preferred)
//! let price = Money::from_minor(1200); // 12.00 JOD
//!
//! // Arithmetic operations
//! let line = price * 2;                          // 24.00
//! let total = line + Money::from_minor(299);     // 26.99
//!
//! // NEVER do this:
//! // let bad = Money::from_float(12.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

use crate::types::TaxRate;

// =============================================================================
// Rounding
// =============================================================================

/// Divides `numer / denom` rounding half away from zero.
///
/// All fractional money (tax, percentage discounts) flows through this one
/// function so the rounding discipline cannot diverge between call sites.
/// `denom` must be positive.
const fn div_round_half_away(numer: i128, denom: i128) -> i64 {
    let half = denom / 2;
    let adjusted = if numer >= 0 { numer + half } else { numer - half };
    (adjusted / denom) as i64
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (qirsh for JOD).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate subtraction (discounts) may dip negative
///   before the final clamp; the type must be able to represent that
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support, serialized transparently as the integer
///
/// ## Where Money Flows
/// ```text
/// Dish.price ──► ValidatedLineItem.unit_price ──► line_total ──► subtotal
///                                                                   │
///                 delivery fee ◄── tier policy ◄───────────────────┤
///                 tax ◄── calculate_tax (pre-discount) ◄───────────┤
///                 discount ◄── promo resolution ◄──────────────────┘
///                                                                   │
///                                 grand total ◄── totals assembly ◄─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units (qirsh).
    ///
    /// ## Example
    /// ```rust
    /// use sufra_core::money::Money;
    ///
    /// let price = Money::from_minor(1250); // 12.50 JOD
    /// assert_eq!(price.minor(), 1250);
    /// ```
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates a Money value from major and minor units (dinars and qirsh).
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` = -5.50, not -4.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units (qirsh).
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dinars) portion.
    #[inline]
    pub const fn major_part(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns the value as a major-unit decimal number.
    ///
    /// For the serialized API contract only; no arithmetic ever runs on the
    /// returned float.
    #[inline]
    pub fn to_major_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the smaller of two amounts.
    #[inline]
    pub fn min(self, other: Money) -> Money {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    /// Returns the larger of two amounts.
    #[inline]
    pub fn max(self, other: Money) -> Money {
        if self.0 >= other.0 {
            self
        } else {
            other
        }
    }

    /// Clamps a negative amount to zero.
    #[inline]
    pub const fn clamp_non_negative(self) -> Money {
        if self.0 < 0 {
            Money(0)
        } else {
            self
        }
    }

    /// Calculates tax on this amount, rounding half away from zero.
    ///
    /// ## Example
    /// ```rust
    /// use sufra_core::money::Money;
    /// use sufra_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_minor(2400); // 24.00 JOD
    /// let rate = TaxRate::from_bps(850);      // 8.5%
    ///
    /// // 24.00 × 8.5% = 2.04
    /// assert_eq!(subtotal.calculate_tax(rate).minor(), 204);
    /// ```
    ///
    /// ## Implementation
    /// Integer math on an i128 intermediate to prevent overflow:
    /// `amount_minor * bps / 10000`, rounded half away from zero.
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money(div_round_half_away(
            self.0 as i128 * rate.bps() as i128,
            10_000,
        ))
    }

    /// Returns the given percentage of this amount.
    ///
    /// ## Arguments
    /// * `bps` - Percentage in basis points (1000 = 10%)
    ///
    /// ## Example
    /// ```rust
    /// use sufra_core::money::Money;
    ///
    /// let subtotal = Money::from_minor(5500); // 55.00 JOD
    /// assert_eq!(subtotal.percentage(1000).minor(), 550); // 10% = 5.50
    /// ```
    pub fn percentage(&self, bps: u32) -> Money {
        Money(div_round_half_away(self.0 as i128 * bps as i128, 10_000))
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use sufra_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(1200); // 12.00 JOD
    /// assert_eq!(unit_price.multiply_quantity(2).minor(), 2400);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for logs and notes. API serialization goes through
/// [`Money::to_major_f64`] in the DTO layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:02}",
            sign,
            self.major_part().abs(),
            self.minor_part()
        )
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

/// Addition of two Money values.
impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Addition assignment (+=).
impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

/// Subtraction of two Money values.
impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

/// Subtraction assignment (-=).
impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i32) -> Self {
        Money(self.0 * qty as i64)
    }
}

/// Multiplication by i64.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Sums an iterator of Money values.
impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_minor() {
        let money = Money::from_minor(1250);
        assert_eq!(money.minor(), 1250);
        assert_eq!(money.major_part(), 12);
        assert_eq!(money.minor_part(), 50);
    }

    #[test]
    fn test_from_major_minor() {
        let money = Money::from_major_minor(12, 50);
        assert_eq!(money.minor(), 1250);

        let negative = Money::from_major_minor(-5, 50);
        assert_eq!(negative.minor(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_minor(1250)), "12.50");
        assert_eq!(format!("{}", Money::from_minor(500)), "5.00");
        assert_eq!(format!("{}", Money::from_minor(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_minor(0)), "0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_minor(1000);
        let b = Money::from_minor(500);

        assert_eq!((a + b).minor(), 1500);
        assert_eq!((a - b).minor(), 500);
        let result: Money = a * 3;
        assert_eq!(result.minor(), 3000);
    }

    #[test]
    fn test_tax_calculation_standard_basket() {
        // 24.00 at 8.5% = 2.04 exactly
        let subtotal = Money::from_minor(2400);
        let rate = TaxRate::from_bps(850);
        assert_eq!(subtotal.calculate_tax(rate).minor(), 204);
    }

    #[test]
    fn test_tax_calculation_with_rounding() {
        // 10.00 at 8.25% = 0.825, rounds away from zero to 0.83
        let amount = Money::from_minor(1000);
        let rate = TaxRate::from_bps(825);
        assert_eq!(amount.calculate_tax(rate).minor(), 83);
    }

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        // 0.5 ties round away from zero, both signs
        assert_eq!(div_round_half_away(25, 10), 3);
        assert_eq!(div_round_half_away(-25, 10), -3);
        assert_eq!(div_round_half_away(24, 10), 2);
        assert_eq!(div_round_half_away(-24, 10), -2);
    }

    #[test]
    fn test_percentage() {
        let subtotal = Money::from_minor(5500);
        assert_eq!(subtotal.percentage(1000).minor(), 550); // 10%
        assert_eq!(subtotal.percentage(0).minor(), 0);

        // 33.33 at 15% = 4.9995, rounds to 5.00
        assert_eq!(Money::from_minor(3333).percentage(1500).minor(), 500);
    }

    #[test]
    fn test_min_max_clamp() {
        let a = Money::from_minor(299);
        let b = Money::from_minor(250);

        assert_eq!(a.min(b), b);
        assert_eq!(a.max(b), a);
        assert_eq!(Money::from_minor(-10).clamp_non_negative(), Money::zero());
        assert_eq!(Money::from_minor(10).clamp_non_negative().minor(), 10);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_minor(1200);
        assert_eq!(unit_price.multiply_quantity(2).minor(), 2400);
    }

    #[test]
    fn test_sum() {
        let total: Money = [100, 200, 300]
            .iter()
            .map(|m| Money::from_minor(*m))
            .sum();
        assert_eq!(total.minor(), 600);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_minor(100);
        assert!(positive.is_positive());

        let negative = Money::from_minor(-100);
        assert!(negative.is_negative());
    }
}
