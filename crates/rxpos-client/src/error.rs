//! # Client Error Types
//!
//! The error taxonomy of the backend boundary.
//!
//! ## Categories
//! ```text
//! ┌───────────────────────┐  ┌────────────────────────────────────┐
//! │  Local (pre-network)  │  │  Remote                            │
//! │                       │  │                                    │
//! │  Core (validation,    │  │  RequestFailed { reason: Some }    │
//! │    invalid transition)│  │    business rejection, message     │
//! │  SubmissionInProgress │  │    comes verbatim from the server  │
//! │  NotAuthenticated     │  │  RequestFailed { reason: None }    │
//! │  ConfigLoadFailed     │  │    transport failure, no message   │
//! │                       │  │  ConflictOnReceive                 │
//! └───────────────────────┘  └────────────────────────────────────┘
//! ```
//!
//! Local errors are reported synchronously and never reach the network
//! layer. No submission is retried automatically: a duplicate sale
//! cannot be assumed idempotent without a server-side idempotency key,
//! which this backend does not provide.

use thiserror::Error;

use rxpos_core::CoreError;

/// Errors surfaced by the backend boundary.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Local business-rule or validation failure (empty cart, invalid
    /// quantity, disallowed state transition). Raised before any
    /// request is issued.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A submission for this cart/order is already in flight. The
    /// second attempt is rejected locally, not queued, so a double
    /// click cannot create a duplicate order.
    #[error("submission already in progress")]
    SubmissionInProgress,

    /// No bearer credential in the session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The server rejected the request, or transport failed.
    ///
    /// `Some(reason)` carries the server's detail string verbatim
    /// (insufficient stock, invalid customer, ...); `None` is a
    /// connection-level failure with no server message.
    #[error("request failed: {}", .reason.as_deref().unwrap_or("connection error"))]
    RequestFailed { reason: Option<String> },

    /// A receive action no longer matches the order's server-side
    /// state (e.g. already fully received elsewhere). Surfaced
    /// distinctly so the UI refreshes instead of blindly retrying.
    #[error("receive conflict: the order changed on the server, refresh and retry")]
    ConflictOnReceive,

    /// Client configuration could not be loaded.
    #[error("failed to load configuration: {0}")]
    ConfigLoadFailed(String),
}

impl ClientError {
    /// True when the server rejected the request for a business
    /// reason and supplied a message for the operator.
    pub fn is_business_rejection(&self) -> bool {
        matches!(self, ClientError::RequestFailed { reason: Some(_) })
    }

    /// True for errors raised locally, before any network traffic.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Core(_)
                | ClientError::SubmissionInProgress
                | ClientError::NotAuthenticated
                | ClientError::ConfigLoadFailed(_)
        )
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
