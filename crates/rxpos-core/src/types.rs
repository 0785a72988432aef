//! # Domain Types
//!
//! Types shared between the cart, the purchase lifecycle and the
//! backend boundary. Wire format is snake_case JSON matching the
//! backend service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Medicine
// =============================================================================

/// A priceable catalog item as returned by the backend search.
///
/// The numeric `id` is the database key used in payloads; `medicine_id`
/// is the human-readable business code printed on labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: i64,

    /// Business identifier (e.g. "MED-00421").
    pub medicine_id: String,

    pub name: String,

    pub generic_name: Option<String>,

    /// Unit sale price in minor units.
    pub unit_price_cents: i64,

    /// Dispensing unit ("tablet", "bottle", ...).
    pub unit: String,

    /// Stock level at the time of the search response. Display-only on
    /// the client; the server re-checks on submit.
    pub stock_quantity: i64,

    pub requires_prescription: bool,
}

impl Medicine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Customer summary as projected by the POS customer search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: i64,
    /// Business identifier (e.g. "CUST-0042").
    pub customer_id: String,
    pub name: String,
    pub phone: Option<String>,
    pub loyalty_points: i64,
}

// =============================================================================
// Payment Method
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Mobile,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Mobile => write!(f, "mobile"),
        }
    }
}

// =============================================================================
// Sale Receipt
// =============================================================================

/// The authoritative sale record returned by the backend after a
/// successful submit. The local cart is destroyed once this exists;
/// re-fetches of sales history use the same shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReceipt {
    pub id: i64,
    pub receipt_number: String,
    pub customer_id: Option<i64>,
    pub total_amount_cents: i64,
    pub discount_amount_cents: i64,
    pub tax_amount_cents: i64,
    pub grand_total_cents: i64,
    pub payment_method: PaymentMethod,
    pub created_at: DateTime<Utc>,
}

impl SaleReceipt {
    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Card).unwrap(), "\"card\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Mobile).unwrap(), "\"mobile\"");

        let m: PaymentMethod = serde_json::from_str("\"mobile\"").unwrap();
        assert_eq!(m, PaymentMethod::Mobile);
    }

    #[test]
    fn payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }
}
