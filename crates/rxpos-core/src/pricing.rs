//! # Pricing Calculator
//!
//! Pure totals derivation for an in-progress sale.
//!
//! ## Derivation
//! ```text
//! line_total     = quantity × unit_price − line_discount% of that
//! subtotal       = Σ line_total
//! discount       = cart_discount% of subtotal
//! tax            = tax_rate% of subtotal
//! grand_total    = subtotal − discount + tax
//! ```
//!
//! Totals are re-derived from the current lines on every read; nothing
//! here is cached, so a stale grand total cannot survive a cart
//! mutation. Input is assumed validated (quantity ≥ 1, price ≥ 0) —
//! that boundary lives in [`crate::cart`] and [`crate::validation`].

use serde::{Deserialize, Serialize};

use crate::money::{Money, Percent};

/// The derived totals of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Money,
    pub discount_amount: Money,
    pub tax_amount: Money,
    pub grand_total: Money,
}

impl CartTotals {
    /// Totals of an empty cart.
    pub fn empty() -> Self {
        CartTotals {
            subtotal: Money::zero(),
            discount_amount: Money::zero(),
            tax_amount: Money::zero(),
            grand_total: Money::zero(),
        }
    }
}

/// Computes a single line total: quantity × unit price, less the
/// line-level discount.
pub fn line_total(quantity: i64, unit_price: Money, discount: Percent) -> Money {
    let gross = unit_price.times(quantity);
    gross - discount.of(gross)
}

/// Derives cart totals from the current line totals and cart-level
/// policy. The cart discount and tax are both computed on the
/// subtotal, matching the backend's settlement math.
pub fn totals<I>(line_totals: I, cart_discount: Percent, tax_rate: Percent) -> CartTotals
where
    I: IntoIterator<Item = Money>,
{
    let subtotal: Money = line_totals.into_iter().sum();
    let discount_amount = cart_discount.of(subtotal);
    let tax_amount = tax_rate.of(subtotal);

    CartTotals {
        subtotal,
        discount_amount,
        tax_amount,
        grand_total: subtotal - discount_amount + tax_amount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_total_without_discount() {
        let total = line_total(3, Money::from_cents(10_000), Percent::zero());
        assert_eq!(total.cents(), 30_000);
    }

    #[test]
    fn line_total_with_discount() {
        // 1 × 50.00 at 10% off = 45.00
        let total = line_total(1, Money::from_cents(5_000), Percent::from_percent(10.0));
        assert_eq!(total.cents(), 4_500);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let t = totals(std::iter::empty(), Percent::from_percent(5.0), Percent::from_percent(18.0));
        assert_eq!(t, CartTotals::empty());
    }

    /// Two lines (3 × 100.00, 1 × 50.00 at 10% line discount), cart
    /// discount 5%, tax 18%.
    #[test]
    fn totals_two_line_scenario() {
        let lines = vec![
            line_total(3, Money::from_cents(10_000), Percent::zero()),
            line_total(1, Money::from_cents(5_000), Percent::from_percent(10.0)),
        ];
        let t = totals(lines, Percent::from_percent(5.0), Percent::from_percent(18.0));

        assert_eq!(t.subtotal.cents(), 34_500); // 345.00
        assert_eq!(t.discount_amount.cents(), 1_725); // 17.25
        assert_eq!(t.tax_amount.cents(), 6_210); // 62.10
        assert_eq!(t.grand_total.cents(), 38_985); // 389.85
    }

    #[test]
    fn grand_total_identity_holds() {
        let lines = vec![
            line_total(7, Money::from_cents(1_299), Percent::from_percent(2.5)),
            line_total(2, Money::from_cents(450), Percent::zero()),
        ];
        let t = totals(lines.clone(), Percent::from_percent(3.0), Percent::from_percent(18.0));

        let subtotal: Money = lines.into_iter().sum();
        assert_eq!(t.subtotal, subtotal);
        assert_eq!(t.grand_total, t.subtotal - t.discount_amount + t.tax_amount);
    }
}
