//! # Transaction Submitter
//!
//! Drives the submit-side of a checkout session: finalizing a sale,
//! creating supplier orders, recording receipts, and status updates.
//!
//! ## Submission Flow
//! ```text
//! ┌────────────┐  guard   ┌────────────┐  request  ┌────────────┐
//! │ local      │─────────►│ in-flight  │──────────►│ backend    │
//! │ validation │          │ (at most   │           │ (authorit- │
//! │ (core)     │          │  one)      │           │  ative)    │
//! └────────────┘          └────────────┘           └─────┬──────┘
//!        │ Err: nothing sent                             │
//!        ▼                                     ┌─────────┴─────────┐
//!   caller, synchronously                      ▼                   ▼
//!                                        success: apply      failure: local
//!                                        + event + clear     state untouched
//! ```
//!
//! At most one submission per submitter is in flight at a time; a
//! second call while one is pending fails with `SubmissionInProgress`
//! instead of queueing, so a double-clicked button cannot create a
//! duplicate sale or order. Failed submissions never mutate local
//! state and are never retried automatically.
//!
//! Completed transactions are announced on a broadcast channel so
//! other views (receipt printer, stock display, order list) can react
//! without being threaded through the call site.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;
use tracing::{info, warn};

use rxpos_core::{
    plan_receive, Cart, OrderStatus, PurchaseOrder, SaleReceipt,
};

use crate::api::{PharmacyApi, PurchaseOrderRequest, ReceiveRequest, SaleRequest};
use crate::error::{ClientError, ClientResult};

/// Announcement of a completed transaction.
#[derive(Debug, Clone)]
pub enum TransactionEvent {
    /// A sale went through; carries the backend receipt.
    SaleCompleted(SaleReceipt),
    /// A purchase order was created.
    OrderCreated { order_id: i64 },
    /// A purchase order changed status (receive, cancel, manual move).
    OrderUpdated { order_id: i64, status: OrderStatus },
}

/// Clears the in-flight flag when the submission ends, on every path.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Submit-side coordinator for one checkout session.
pub struct TransactionSubmitter<A: PharmacyApi> {
    api: Arc<A>,
    in_flight: AtomicBool,
    events: broadcast::Sender<TransactionEvent>,
}

impl<A: PharmacyApi> TransactionSubmitter<A> {
    pub fn new(api: Arc<A>) -> Self {
        let (events, _) = broadcast::channel(32);
        TransactionSubmitter {
            api,
            in_flight: AtomicBool::new(false),
            events,
        }
    }

    /// Subscribes to transaction announcements.
    pub fn subscribe(&self) -> broadcast::Receiver<TransactionEvent> {
        self.events.subscribe()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    fn acquire(&self) -> ClientResult<InFlightGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map_err(|_| ClientError::SubmissionInProgress)?;
        Ok(InFlightGuard(&self.in_flight))
    }

    fn announce(&self, event: TransactionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    // =========================================================================
    // Sales
    // =========================================================================

    /// Submits the cart as a sale.
    ///
    /// The payload is built under the cart lock, which is released
    /// before the request is issued; the cashier can keep scanning
    /// into a different cart while this one is in flight. On success
    /// the cart is cleared and `SaleCompleted` is announced. On any
    /// failure the cart is left exactly as it was.
    pub async fn submit_sale(&self, cart: &Mutex<Cart>) -> ClientResult<SaleReceipt> {
        let _guard = self.acquire()?;

        let request = {
            let cart = cart.lock().expect("cart lock poisoned");
            SaleRequest::from_cart(&cart)?
        };

        let receipt = match self.api.submit_sale(&request).await {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(error = %e, "sale submission failed, cart preserved");
                return Err(e);
            }
        };

        info!(
            receipt = %receipt.receipt_number,
            grand_total_cents = receipt.grand_total_cents,
            "sale completed"
        );

        cart.lock().expect("cart lock poisoned").clear();
        self.announce(TransactionEvent::SaleCompleted(receipt.clone()));
        Ok(receipt)
    }

    // =========================================================================
    // Purchase orders
    // =========================================================================

    /// Creates a purchase order. The request is already validated by
    /// [`PurchaseOrderRequest::new`].
    pub async fn create_order(
        &self,
        request: &PurchaseOrderRequest,
    ) -> ClientResult<PurchaseOrder> {
        let _guard = self.acquire()?;

        let order = self.api.create_purchase_order(request).await?;
        info!(order_id = order.id, supplier_id = order.supplier_id, "purchase order created");
        self.announce(TransactionEvent::OrderCreated { order_id: order.id });
        Ok(order)
    }

    /// Records a delivery against `order`.
    ///
    /// `overrides` maps medicine id to received quantity; items left
    /// out default to their full ordered quantity. Validation happens
    /// locally before any request is issued. The backend's response is
    /// authoritative: its status and item quantities overwrite the
    /// local order, even where they differ from the plan's hint.
    pub async fn receive_order(
        &self,
        order: &mut PurchaseOrder,
        overrides: &HashMap<i64, i64>,
    ) -> ClientResult<OrderStatus> {
        let _guard = self.acquire()?;

        let plan = plan_receive(order, overrides)?;
        let request = ReceiveRequest::from(&plan);

        let response = self.api.receive_purchase_order(order.id, &request).await?;

        if response.status != plan.target_status {
            info!(
                order_id = order.id,
                hint = %plan.target_status,
                server = %response.status,
                "server overrode receive status hint"
            );
        }

        order.apply_receive(response.status, response.items);
        self.announce(TransactionEvent::OrderUpdated {
            order_id: order.id,
            status: order.status,
        });
        Ok(order.status)
    }

    /// Cancels an order that has not started receiving.
    ///
    /// Deliberately stricter than the raw lifecycle: a partially
    /// received order must be resolved through
    /// [`update_status`](Self::update_status), not a one-click cancel.
    pub async fn cancel_order(&self, order: &mut PurchaseOrder) -> ClientResult<()> {
        if !matches!(order.status, OrderStatus::Pending | OrderStatus::Ordered) {
            return Err(rxpos_core::CoreError::InvalidTransition {
                from: order.status,
                to: OrderStatus::Cancelled,
            }
            .into());
        }

        self.update_status(order, OrderStatus::Cancelled).await?;
        Ok(())
    }

    /// Moves an order to `to`, lifecycle permitting. The transition is
    /// checked locally first; an invalid move never reaches the
    /// network layer.
    pub async fn update_status(
        &self,
        order: &mut PurchaseOrder,
        to: OrderStatus,
    ) -> ClientResult<OrderStatus> {
        order
            .status
            .ensure_transition(to)
            .map_err(ClientError::Core)?;

        let _guard = self.acquire()?;

        let confirmed = self.api.update_purchase_order_status(order.id, to).await?;
        info!(order_id = order.id, from = %order.status, to = %confirmed, "order status updated");

        order.status = confirmed;
        self.announce(TransactionEvent::OrderUpdated {
            order_id: order.id,
            status: confirmed,
        });
        Ok(confirmed)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
