//! # rxpos-client: Backend Boundary for RxPOS
//!
//! Everything between the pure transaction core ([`rxpos_core`]) and
//! the pharmacy backend service: session credentials, configuration,
//! the HTTP client, debounced catalog search, and the transaction
//! submitter.
//!
//! ## Architecture Position
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                     UI Layer (external)                        │
//! └───────┬───────────────────┬───────────────────┬────────────────┘
//!         │ keystrokes        │ cart actions      │ submit/receive
//! ┌───────▼───────┐   ┌───────▼────────┐   ┌──────▼───────────────┐
//! │ DebouncedSearch│  │ rxpos_core::Cart│  │ TransactionSubmitter │
//! │ last-request-  │  │ (pure, no I/O) │   │ in-flight guard,     │
//! │ wins           │  └────────────────┘   │ events               │
//! └───────┬────────┘                       └──────┬───────────────┘
//!         │            ┌────────────┐             │
//!         └───────────►│ PharmacyApi│◄────────────┘
//!                      │  (trait)   │
//!                      └─────┬──────┘
//!                            │ HttpApi (reqwest) + Session bearer
//!                            ▼
//!                   pharmacy backend service
//! ```
//!
//! The backend is authoritative for everything it answers: stock,
//! pricing verification, receive outcomes, order status. This crate
//! validates locally to fail fast, then defers to the server's word.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod search;
pub mod session;
pub mod submitter;

pub use api::{
    PharmacyApi, PurchaseOrderItemRequest, PurchaseOrderRequest, ReceiveRequest,
    ReceiveResponse, SaleItemRequest, SaleRequest,
};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::HttpApi;
pub use search::{DebouncedSearch, SearchOutcome};
pub use session::{Session, User};
pub use submitter::{TransactionEvent, TransactionSubmitter};
