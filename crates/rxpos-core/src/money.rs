//! # Money and Percent
//!
//! Monetary values as integer minor units, rates as basis points.
//!
//! ## Why Integer Money?
//! ```text
//! In floating point: 0.1 + 0.2 = 0.30000000000000004
//! In minor units:    10 + 20 = 30 cents, exactly
//! ```
//! Every price, discount and total in the system flows through
//! [`Money`]. Rounding happens once per derived value (discount, tax),
//! never accumulates, and display formatting is purely presentational.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// Signed so that discounts and refunds can be represented; a single
/// i64 of minor units covers any realistic pharmacy ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a value from minor units (cents).
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies by a quantity (line totals).
    #[inline]
    pub const fn times(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

/// Debug/receipt formatting: major units with two decimals.
/// Locale-aware formatting belongs to the UI layer.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Percent
// =============================================================================

/// A percentage rate in basis points (1 bps = 0.01%).
///
/// Used for both line/cart discounts and the tax policy. 500 bps = 5%,
/// 10000 bps = 100%. Keeping rates integral makes `Percent::of`
/// deterministic: `(cents × bps + 5000) / 10000`, rounded half-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(u32);

impl Percent {
    /// Maximum representable rate: 100%.
    pub const MAX_BPS: u32 = 10_000;

    /// Creates a rate from basis points, saturating at 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > Self::MAX_BPS {
            Percent(Self::MAX_BPS)
        } else {
            Percent(bps)
        }
    }

    /// Creates a rate from a percentage, clamped to [0, 100].
    ///
    /// Non-finite input clamps to zero; the UI hands us whatever the
    /// operator typed and the boundary must not panic.
    pub fn from_percent(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return Percent(0);
        }
        let bps = (pct * 100.0).round() as u32;
        Percent::from_bps(bps)
    }

    /// The rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The rate as a percentage, for display only.
    #[inline]
    pub fn as_percent(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Applies the rate to an amount, rounding half-up.
    ///
    /// Widens to i128 so large carts cannot overflow the intermediate
    /// product.
    pub fn of(&self, amount: Money) -> Money {
        let cents = (amount.cents() as i128 * self.0 as i128 + 5_000) / 10_000;
        Money::from_cents(cents as i64)
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(450);

        assert_eq!((a + b).cents(), 1450);
        assert_eq!((a - b).cents(), 550);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!(a.times(2).cents(), 2000);
    }

    #[test]
    fn money_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "0.00");
    }

    #[test]
    fn money_sum() {
        let total: Money = [100, 200, 345]
            .iter()
            .map(|c| Money::from_cents(*c))
            .sum();
        assert_eq!(total.cents(), 645);
    }

    #[test]
    fn percent_from_percent_clamps() {
        assert_eq!(Percent::from_percent(10.0).bps(), 1000);
        assert_eq!(Percent::from_percent(0.5).bps(), 50);
        assert_eq!(Percent::from_percent(-3.0).bps(), 0);
        assert_eq!(Percent::from_percent(150.0).bps(), Percent::MAX_BPS);
        assert_eq!(Percent::from_percent(f64::NAN).bps(), 0);
        assert_eq!(Percent::from_percent(f64::INFINITY).bps(), 0);
    }

    #[test]
    fn percent_of_rounds_half_up() {
        // 8.25% of 10.00 = 0.825 -> 0.83
        let rate = Percent::from_bps(825);
        assert_eq!(rate.of(Money::from_cents(1000)).cents(), 83);

        // 5% of 345.00 = 17.25, exact
        let rate = Percent::from_percent(5.0);
        assert_eq!(rate.of(Money::from_cents(34_500)).cents(), 1725);
    }

    #[test]
    fn percent_of_large_amount_does_not_overflow() {
        let rate = Percent::from_bps(10_000);
        let big = Money::from_cents(i64::MAX / 2);
        assert_eq!(rate.of(big).cents(), i64::MAX / 2);
    }
}
