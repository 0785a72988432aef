//! # Purchase Order Lifecycle
//!
//! Status transitions and receive reconciliation for supplier orders.
//!
//! ## Lifecycle
//! ```text
//!                 ┌───────────┐
//!      ┌──────────│  pending  │──────────────┐
//!      │          └─────┬─────┘              │
//!      ▼                │ receive            ▼
//! ┌─────────┐           │             ┌───────────┐
//! │ ordered │───────────┤             │ cancelled │ (terminal)
//! └────┬────┘           │             └───────────┘
//!      │ receive        ▼                    ▲
//!      │          ┌───────────┐              │
//!      ├─────────►│  partial  │──────────────┤
//!      │          └─────┬─────┘              │
//!      │                │ receive (rest)     │
//!      ▼                ▼                    │
//! ┌──────────────────────────┐               │
//! │         received         │ (terminal) ───┘ (never)
//! └──────────────────────────┘
//! ```
//!
//! A receive action is planned locally ([`plan_receive`]): omitted
//! quantities default to the full ordered quantity, bounds and
//! monotonicity are validated before any request is issued, and the
//! resulting status is derived as an optimistic hint. The backend's
//! response is authoritative and overwrites local state via
//! [`PurchaseOrder::apply_receive`] — the server may apply rules the
//! client cannot see (lot splits, expiry holds).

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Order Status
// =============================================================================

/// Status of a purchase order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// Created, not yet confirmed with the supplier.
    Pending,
    /// Confirmed with the supplier, awaiting delivery.
    Ordered,
    /// Some, but not all, ordered quantity has been received.
    Partial,
    /// Fully received. Terminal.
    Received,
    /// Cancelled before receipt. Terminal.
    Cancelled,
}

impl OrderStatus {
    /// Whether the lifecycle allows moving from `self` to `to`.
    ///
    /// Terminal states accept nothing; everything else follows the
    /// adjacency in the module diagram.
    pub fn can_transition(&self, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, to),
            (Pending, Ordered)
                | (Pending, Partial)
                | (Pending, Received)
                | (Pending, Cancelled)
                | (Ordered, Partial)
                | (Ordered, Received)
                | (Ordered, Cancelled)
                | (Partial, Received)
                | (Partial, Cancelled)
        )
    }

    /// Guard form of [`can_transition`](Self::can_transition); fails
    /// with `InvalidTransition` before any network call is made.
    pub fn ensure_transition(&self, to: OrderStatus) -> CoreResult<()> {
        if self.can_transition(to) {
            Ok(())
        } else {
            Err(CoreError::InvalidTransition { from: *self, to })
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Received | OrderStatus::Cancelled)
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Ordered => write!(f, "ordered"),
            OrderStatus::Partial => write!(f, "partial"),
            OrderStatus::Received => write!(f, "received"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// =============================================================================
// Purchase Order
// =============================================================================

/// One ordered item on a purchase order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderItem {
    pub medicine_id: i64,

    /// Ordered quantity.
    pub quantity: i64,

    /// Agreed unit cost in minor units.
    pub unit_cost_cents: i64,

    /// Confirmed received quantity; unset until a receive action
    /// records it. Invariant once set: 0 ≤ received ≤ ordered.
    pub received_quantity: Option<i64>,

    pub expiry_date: Option<NaiveDate>,

    pub batch_number: Option<String>,
}

impl PurchaseOrderItem {
    /// Whether the full ordered quantity has been received.
    pub fn is_complete(&self) -> bool {
        self.received_quantity == Some(self.quantity)
    }

    /// Quantity still outstanding against the order.
    pub fn outstanding(&self) -> i64 {
        self.quantity - self.received_quantity.unwrap_or(0)
    }
}

/// A supplier-facing purchase order.
///
/// Owned by the session until a submit/receive succeeds; after that
/// the local copy is a read-only cache of the backend record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    pub id: i64,
    pub supplier_id: i64,
    pub order_date: DateTime<Utc>,
    pub expected_delivery: Option<NaiveDate>,
    pub status: OrderStatus,
    pub items: Vec<PurchaseOrderItem>,
    /// Σ quantity × unit cost, fixed at creation. Not recomputed on
    /// receipt — a short delivery does not change what was ordered.
    pub total_amount_cents: i64,
    pub notes: Option<String>,
}

impl PurchaseOrder {
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }

    /// Overwrites received quantities and status from the backend's
    /// authoritative receive response. The locally derived status is
    /// only ever a hint; this is where the server's answer wins.
    pub fn apply_receive(&mut self, status: OrderStatus, items: Vec<PurchaseOrderItem>) {
        self.items = items;
        self.status = status;
    }
}

/// Order value at creation time: Σ quantity × unit cost.
pub fn order_total(items: &[PurchaseOrderItem]) -> Money {
    items
        .iter()
        .map(|i| Money::from_cents(i.unit_cost_cents).times(i.quantity))
        .sum()
}

// =============================================================================
// Receive Planning
// =============================================================================

/// A validated receive action, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivePlan {
    /// medicine_id → quantity to record as received.
    pub quantities: HashMap<i64, i64>,

    /// Locally derived status: `Received` iff every item would be
    /// complete, otherwise `Partial`. Optimistic hint only.
    pub target_status: OrderStatus,
}

/// Plans a receive action against `order`.
///
/// Items omitted from `overrides` default to their full ordered
/// quantity — the common "receive everything as ordered" case is an
/// empty map. All validation is local; a violation never reaches the
/// network layer:
///
/// - every override must reference an item on the order
/// - 0 ≤ quantity ≤ ordered quantity, per item
/// - a quantity below an already-recorded receipt is rejected
///   (received quantities never decrease within a session)
/// - an all-zero receive is rejected as invalid rather than silently
///   accepted as a no-op
pub fn plan_receive(
    order: &PurchaseOrder,
    overrides: &HashMap<i64, i64>,
) -> CoreResult<ReceivePlan> {
    // Terminal orders accept no receipt at all.
    order.status.ensure_transition(OrderStatus::Received)?;

    for medicine_id in overrides.keys() {
        if !order.items.iter().any(|i| i.medicine_id == *medicine_id) {
            return Err(CoreError::UnknownOrderItem {
                medicine_id: *medicine_id,
            });
        }
    }

    let mut quantities = HashMap::with_capacity(order.items.len());
    let mut all_complete = true;
    let mut any_received = false;

    for item in &order.items {
        let qty = overrides
            .get(&item.medicine_id)
            .copied()
            .unwrap_or(item.quantity);

        if qty < 0 || qty > item.quantity {
            return Err(ValidationError::OutOfRange {
                field: format!("received_quantity[{}]", item.medicine_id),
                min: 0,
                max: item.quantity,
            }
            .into());
        }

        let already = item.received_quantity.unwrap_or(0);
        if qty < already {
            return Err(ValidationError::OutOfRange {
                field: format!("received_quantity[{}]", item.medicine_id),
                min: already,
                max: item.quantity,
            }
            .into());
        }

        all_complete &= qty == item.quantity;
        any_received |= qty > 0;
        quantities.insert(item.medicine_id, qty);
    }

    if !any_received {
        return Err(ValidationError::MustBePositive {
            field: "received quantities".to_string(),
        }
        .into());
    }

    let target_status = if all_complete {
        OrderStatus::Received
    } else {
        OrderStatus::Partial
    };

    Ok(ReceivePlan {
        quantities,
        target_status,
    })
}

// =============================================================================
// Reconciliation
// =============================================================================

/// Per-item ordered vs. received comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub medicine_id: i64,
    pub ordered: i64,
    pub received: i64,
    pub outstanding: i64,
}

/// Reconciles an order's items: what was ordered, what is confirmed
/// received, and what remains outstanding.
pub fn reconciliation(order: &PurchaseOrder) -> Vec<Shortfall> {
    order
        .items
        .iter()
        .map(|i| Shortfall {
            medicine_id: i.medicine_id,
            ordered: i.quantity,
            received: i.received_quantity.unwrap_or(0),
            outstanding: i.outstanding(),
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
