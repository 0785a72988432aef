//! # rxpos-core: Pure Business Logic for RxPOS
//!
//! The transaction core of the pharmacy POS: every function here is
//! deterministic and free of I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      RxPOS Architecture                         │
//! │                                                                 │
//! │  ┌───────────────────────────────────────────────────────────┐ │
//! │  │                    UI Layer (external)                    │ │
//! │  │   Search UI ──► Cart UI ──► Checkout ──► Purchase Orders  │ │
//! │  └────────────────────────────┬──────────────────────────────┘ │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐ │
//! │  │              ★ rxpos-core (THIS CRATE) ★                  │ │
//! │  │                                                           │ │
//! │  │  ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌───────────────┐  │ │
//! │  │  │  money  │ │ pricing │ │   cart   │ │   purchase    │  │ │
//! │  │  │  Money  │ │ totals  │ │   Cart   │ │ OrderStatus   │  │ │
//! │  │  │ Percent │ │ lines   │ │ CartLine │ │ ReceivePlan   │  │ │
//! │  │  └─────────┘ └─────────┘ └──────────┘ └───────────────┘  │ │
//! │  │                                                           │ │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS      │ │
//! │  └────────────────────────────┬──────────────────────────────┘ │
//! │                               │                                 │
//! │  ┌────────────────────────────▼──────────────────────────────┐ │
//! │  │             rxpos-client (backend boundary)               │ │
//! │  │      submitter, session, catalog search, HTTP client      │ │
//! │  └───────────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - `Money` (integer minor units) and `Percent` (basis points)
//! - [`types`] - Domain types (Medicine, Customer, PaymentMethod, ...)
//! - [`pricing`] - Pure totals derivation for the cart
//! - [`cart`] - In-progress sale cart with merge/update/remove semantics
//! - [`purchase`] - Purchase order lifecycle and receive reconciliation
//! - [`validation`] - Boundary validation of user input
//! - [`error`] - Typed domain errors
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output, every time
//! 2. **No I/O**: the backend service is reached only via rxpos-client
//! 3. **Integer Money**: monetary values are minor units (i64), never floats
//! 4. **Explicit Errors**: all failures are typed enums, never strings

pub mod cart;
pub mod error;
pub mod money;
pub mod pricing;
pub mod purchase;
pub mod types;
pub mod validation;

pub use cart::{Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::{Money, Percent};
pub use pricing::CartTotals;
pub use purchase::{
    order_total, plan_receive, reconciliation, OrderStatus, PurchaseOrder, PurchaseOrderItem,
    ReceivePlan, Shortfall,
};
pub use types::{Customer, Medicine, PaymentMethod, SaleReceipt};

/// Maximum distinct lines allowed in a single cart.
///
/// Prevents runaway carts; a pharmacy checkout never legitimately
/// reaches this.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Guards against typos (1000 instead of 10). The server applies the
/// authoritative stock check on submit.
pub const MAX_LINE_QUANTITY: i64 = 999;
