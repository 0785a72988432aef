//! # Backend API Contract
//!
//! The request/response boundary with the pharmacy backend, expressed
//! as an object-safe async trait plus the wire DTOs.
//!
//! The trait seam exists so the transaction flows can be exercised
//! against an in-memory fake in tests; production wires in
//! [`crate::http::HttpApi`]. Exact routes are an implementation detail
//! of the HTTP layer — callers only see these operations:
//!
//! ```text
//! search_medicines(query)              -> Vec<Medicine>
//! search_customers(query)              -> Vec<Customer>
//! submit_sale(SaleRequest)             -> SaleReceipt
//! create_purchase_order(request)       -> PurchaseOrder
//! receive_purchase_order(id, request)  -> ReceiveResponse
//! update_purchase_order_status(id, s)  -> OrderStatus
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use rxpos_core::validation::{validate_quantity, validate_unit_cost_cents};
use rxpos_core::{
    Cart, CoreError, Customer, Medicine, OrderStatus, PaymentMethod, PurchaseOrderItem,
    ReceivePlan, SaleReceipt, ValidationError,
};

use crate::error::ClientResult;

// =============================================================================
// Sale DTOs
// =============================================================================

/// One line of a sale payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItemRequest {
    pub medicine_id: i64,
    pub quantity: i64,
    pub discount_percent: f64,
}

/// The finalized cart, serialized for submission.
///
/// Amounts are sent alongside the lines so the backend can verify the
/// client's arithmetic; the backend remains authoritative and re-prices
/// from its own catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleRequest {
    pub customer_id: Option<i64>,
    pub items: Vec<SaleItemRequest>,
    pub payment_method: PaymentMethod,
    pub discount_amount_cents: i64,
    pub tax_amount_cents: i64,
    pub grand_total_cents: i64,
}

impl SaleRequest {
    /// Serializes an in-progress cart. Totals are derived fresh here,
    /// never taken from a cached value.
    ///
    /// Fails with a local validation error when the cart is empty.
    pub fn from_cart(cart: &Cart) -> ClientResult<Self> {
        if cart.is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "cart items".to_string(),
            })
            .into());
        }

        let totals = cart.totals();

        Ok(SaleRequest {
            customer_id: cart.customer_id(),
            items: cart
                .lines()
                .iter()
                .map(|line| SaleItemRequest {
                    medicine_id: line.medicine_id,
                    quantity: line.quantity,
                    discount_percent: line.discount.as_percent(),
                })
                .collect(),
            payment_method: cart.payment_method(),
            discount_amount_cents: totals.discount_amount.cents(),
            tax_amount_cents: totals.tax_amount.cents(),
            grand_total_cents: totals.grand_total.cents(),
        })
    }
}

// =============================================================================
// Purchase Order DTOs
// =============================================================================

/// One item of a purchase order creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderItemRequest {
    pub medicine_id: i64,
    pub quantity: i64,
    pub unit_cost_cents: i64,
    pub expiry_date: Option<NaiveDate>,
    pub batch_number: Option<String>,
}

/// Purchase order creation payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrderRequest {
    pub supplier_id: i64,
    pub items: Vec<PurchaseOrderItemRequest>,
    pub expected_delivery: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl PurchaseOrderRequest {
    /// Builds and validates a creation payload: at least one item,
    /// quantity > 0 and unit cost ≥ 0 on every item.
    pub fn new(
        supplier_id: i64,
        items: Vec<PurchaseOrderItemRequest>,
        expected_delivery: Option<NaiveDate>,
        notes: Option<String>,
    ) -> ClientResult<Self> {
        if items.is_empty() {
            return Err(CoreError::from(ValidationError::Required {
                field: "items".to_string(),
            })
            .into());
        }

        for item in &items {
            validate_quantity(item.quantity).map_err(CoreError::from)?;
            validate_unit_cost_cents(item.unit_cost_cents).map_err(CoreError::from)?;
        }

        Ok(PurchaseOrderRequest {
            supplier_id,
            items,
            expected_delivery,
            notes,
        })
    }
}

/// A planned receive action, serialized for submission. The status is
/// the locally derived hint; the server's answer overrides it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveRequest {
    /// medicine_id → received quantity.
    pub quantities: HashMap<i64, i64>,
    pub status_hint: OrderStatus,
}

impl From<&ReceivePlan> for ReceiveRequest {
    fn from(plan: &ReceivePlan) -> Self {
        ReceiveRequest {
            quantities: plan.quantities.clone(),
            status_hint: plan.target_status,
        }
    }
}

/// The backend's authoritative answer to a receive action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiveResponse {
    pub status: OrderStatus,
    pub items: Vec<PurchaseOrderItem>,
}

/// Body of a status update response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: OrderStatus,
}

// =============================================================================
// API Trait
// =============================================================================

/// The backend boundary. One implementation per transport; tests use
/// an in-memory fake.
#[async_trait]
pub trait PharmacyApi: Send + Sync {
    async fn search_medicines(&self, query: &str) -> ClientResult<Vec<Medicine>>;

    async fn search_customers(&self, query: &str) -> ClientResult<Vec<Customer>>;

    async fn submit_sale(&self, request: &SaleRequest) -> ClientResult<SaleReceipt>;

    async fn create_purchase_order(
        &self,
        request: &PurchaseOrderRequest,
    ) -> ClientResult<rxpos_core::PurchaseOrder>;

    async fn receive_purchase_order(
        &self,
        order_id: i64,
        request: &ReceiveRequest,
    ) -> ClientResult<ReceiveResponse>;

    async fn update_purchase_order_status(
        &self,
        order_id: i64,
        status: OrderStatus,
    ) -> ClientResult<OrderStatus>;
}
