//! # Cart
//!
//! The in-progress, unsubmitted sale for one checkout session.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌──────────┐      ┌──────────┐      ┌───────────┐
//! │  Empty   │─────►│ In Cart  │─────►│ Submitted │
//! │          │      │          │      │ (backend) │
//! └──────────┘      └──────────┘      └───────────┘
//!       ▲              │    add_item / update / remove
//!       │              ▼
//!       └───────── clear()  (submit success or explicit cancel)
//! ```
//!
//! ## Invariants
//! - Lines are unique by medicine id; adding the same item again
//!   accumulates quantity instead of creating a duplicate line
//! - Insertion order is display order
//! - Quantity is always ≥ 1; an update below 1 removes the line
//! - Totals are derived through [`crate::pricing`] on every read,
//!   never cached across a mutation
//!
//! The cart does not enforce stock: `stock_on_add` is a display
//! snapshot, and the authoritative check happens server-side on submit.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Percent};
use crate::pricing::{self, CartTotals};
use crate::types::{Medicine, PaymentMethod};
use crate::validation::validate_quantity;
use crate::MAX_CART_LINES;

/// One line of an in-progress sale.
///
/// Price and name are frozen at the moment the item is added, so the
/// cart stays consistent even if the catalog entry changes underneath.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Database id of the medicine.
    pub medicine_id: i64,

    /// Business code at time of adding (frozen).
    pub code: String,

    /// Display name at time of adding (frozen).
    pub name: String,

    /// Unit price in minor units at time of adding (frozen).
    pub unit_price_cents: i64,

    /// Dispensing unit, for display.
    pub unit: String,

    /// Stock level reported by the search response; display only.
    pub stock_on_add: i64,

    /// Quantity, always ≥ 1.
    pub quantity: i64,

    /// Line-level discount.
    pub discount: Percent,
}

impl CartLine {
    fn from_medicine(medicine: &Medicine, quantity: i64) -> Self {
        CartLine {
            medicine_id: medicine.id,
            code: medicine.medicine_id.clone(),
            name: medicine.name.clone(),
            unit_price_cents: medicine.unit_price_cents,
            unit: medicine.unit.clone(),
            stock_on_add: medicine.stock_quantity,
            quantity,
            discount: Percent::zero(),
        }
    }

    /// Unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Line total: quantity × unit price less the line discount.
    /// Recomputed on every call.
    pub fn line_total(&self) -> Money {
        pricing::line_total(self.quantity, self.unit_price(), self.discount)
    }
}

/// The in-progress sale cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    customer_id: Option<i64>,
    payment_method: PaymentMethod,
    discount: Percent,
    /// Tax policy, fixed for the session at construction.
    tax_rate: Percent,
}

impl Cart {
    /// Creates an empty cart with the session's tax policy.
    pub fn new(tax_rate: Percent) -> Self {
        Cart {
            lines: Vec::new(),
            customer_id: None,
            payment_method: PaymentMethod::default(),
            discount: Percent::zero(),
            tax_rate,
        }
    }

    // =========================================================================
    // Line mutation
    // =========================================================================

    /// Adds a medicine to the cart, or accumulates quantity if a line
    /// for the same item already exists.
    pub fn add_item(&mut self, medicine: &Medicine, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.medicine_id == medicine.id) {
            let new_qty = line.quantity + quantity;
            validate_quantity(new_qty)?;
            line.quantity = new_qty;
            return Ok(());
        }

        if self.lines.len() >= MAX_CART_LINES {
            return Err(CoreError::CartTooLarge { max: MAX_CART_LINES });
        }

        self.lines.push(CartLine::from_medicine(medicine, quantity));
        Ok(())
    }

    /// Sets the quantity of a line. A request to go below 1 is treated
    /// as removal, not as an error. Unknown ids are a no-op.
    pub fn update_quantity(&mut self, medicine_id: i64, quantity: i64) -> CoreResult<()> {
        if quantity < 1 {
            self.remove_item(medicine_id);
            return Ok(());
        }

        validate_quantity(quantity)?;

        if let Some(line) = self.lines.iter_mut().find(|l| l.medicine_id == medicine_id) {
            line.quantity = quantity;
        }
        Ok(())
    }

    /// Sets the line-level discount; the percentage is clamped to
    /// [0, 100] by `Percent::from_percent`.
    pub fn update_discount(&mut self, medicine_id: i64, percent: f64) {
        if let Some(line) = self.lines.iter_mut().find(|l| l.medicine_id == medicine_id) {
            line.discount = Percent::from_percent(percent);
        }
    }

    /// Removes a line. Removal is idempotent: an absent id leaves the
    /// cart unchanged.
    pub fn remove_item(&mut self, medicine_id: i64) {
        self.lines.retain(|l| l.medicine_id != medicine_id);
    }

    /// Drops all lines and resets customer, payment method and cart
    /// discount to defaults. Used after a successful submit and on
    /// explicit cancel.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.customer_id = None;
        self.payment_method = PaymentMethod::default();
        self.discount = Percent::zero();
    }

    // =========================================================================
    // Selections
    // =========================================================================

    pub fn set_customer(&mut self, customer_id: Option<i64>) {
        self.customer_id = customer_id;
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = method;
    }

    /// Cart-level discount, clamped to [0, 100].
    pub fn set_discount(&mut self, percent: f64) {
        self.discount = Percent::from_percent(percent);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn customer_id(&self) -> Option<i64> {
        self.customer_id
    }

    pub fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    pub fn discount(&self) -> Percent {
        self.discount
    }

    pub fn tax_rate(&self) -> Percent {
        self.tax_rate
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Derives the current totals. Never cached.
    pub fn totals(&self) -> CartTotals {
        pricing::totals(
            self.lines.iter().map(|l| l.line_total()),
            self.discount,
            self.tax_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn medicine(id: i64, price_cents: i64) -> Medicine {
        Medicine {
            id,
            medicine_id: format!("MED-{:05}", id),
            name: format!("Medicine {}", id),
            generic_name: None,
            unit_price_cents: price_cents,
            unit: "tablet".to_string(),
            stock_quantity: 50,
            requires_prescription: false,
        }
    }

    fn cart() -> Cart {
        Cart::new(Percent::from_percent(18.0))
    }

    #[test]
    fn add_item_merges_by_identity() {
        let mut cart = cart();
        let m = medicine(1, 999);

        cart.add_item(&m, 1).unwrap();
        cart.add_item(&m, 1).unwrap();

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 2);
    }

    #[test]
    fn add_item_rejects_invalid_quantity() {
        let mut cart = cart();
        let m = medicine(1, 999);

        assert!(cart.add_item(&m, 0).is_err());
        assert!(cart.add_item(&m, -3).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn update_quantity_below_one_removes_line() {
        let mut cart = cart();
        let m = medicine(1, 999);

        cart.add_item(&m, 2).unwrap();
        cart.update_quantity(1, 0).unwrap();

        assert!(cart.is_empty());
    }

    #[test]
    fn remove_item_is_idempotent() {
        let mut cart = cart();
        let m = medicine(1, 999);
        cart.add_item(&m, 2).unwrap();

        let before = cart.totals();
        cart.remove_item(42); // not in the cart
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.totals(), before);

        cart.remove_item(1);
        cart.remove_item(1); // second removal is a no-op
        assert!(cart.is_empty());
    }

    #[test]
    fn discount_is_clamped() {
        let mut cart = cart();
        let m = medicine(1, 10_000);
        cart.add_item(&m, 1).unwrap();

        cart.update_discount(1, 250.0);
        assert_eq!(cart.lines()[0].discount.bps(), Percent::MAX_BPS);

        cart.update_discount(1, -10.0);
        assert_eq!(cart.lines()[0].discount.bps(), 0);
    }

    #[test]
    fn clear_resets_selections() {
        let mut cart = cart();
        let m = medicine(1, 999);

        cart.add_item(&m, 1).unwrap();
        cart.set_customer(Some(7));
        cart.set_payment_method(PaymentMethod::Card);
        cart.set_discount(5.0);

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.customer_id(), None);
        assert_eq!(cart.payment_method(), PaymentMethod::Cash);
        assert!(cart.discount().is_zero());
    }

    /// Totals invariant: subtotal == Σ line_total and
    /// grand = subtotal − discount + tax, after every mutation.
    #[test]
    fn totals_invariant_after_each_mutation() {
        let mut cart = cart();
        cart.set_discount(5.0);

        let check = |cart: &Cart| {
            let t = cart.totals();
            let subtotal: Money = cart.lines().iter().map(|l| l.line_total()).sum();
            assert_eq!(t.subtotal, subtotal);
            assert_eq!(t.grand_total, t.subtotal - t.discount_amount + t.tax_amount);
        };

        cart.add_item(&medicine(1, 10_000), 3).unwrap();
        check(&cart);
        cart.add_item(&medicine(2, 5_000), 1).unwrap();
        check(&cart);
        cart.update_discount(2, 10.0);
        check(&cart);
        cart.update_quantity(1, 5).unwrap();
        check(&cart);
        cart.remove_item(1);
        check(&cart);
    }

    /// The worked checkout example end to end through the cart.
    #[test]
    fn scenario_two_lines_with_cart_discount_and_tax() {
        let mut cart = cart();
        cart.add_item(&medicine(1, 10_000), 3).unwrap();
        cart.add_item(&medicine(2, 5_000), 1).unwrap();
        cart.update_discount(2, 10.0);
        cart.set_discount(5.0);

        let t = cart.totals();
        assert_eq!(t.subtotal.cents(), 34_500);
        assert_eq!(t.discount_amount.cents(), 1_725);
        assert_eq!(t.tax_amount.cents(), 6_210);
        assert_eq!(t.grand_total.cents(), 38_985);
    }

    #[test]
    fn cart_line_cap_enforced() {
        let mut cart = cart();
        for id in 0..MAX_CART_LINES as i64 {
            cart.add_item(&medicine(id, 100), 1).unwrap();
        }
        let overflow = medicine(MAX_CART_LINES as i64 + 1, 100);
        assert!(matches!(
            cart.add_item(&overflow, 1),
            Err(CoreError::CartTooLarge { .. })
        ));
    }
}
