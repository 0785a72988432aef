//! # Error Types
//!
//! Typed domain errors for rxpos-core.
//!
//! ## Error Hierarchy
//! ```text
//! rxpos-core (this file)
//! ├── CoreError        - business rule violations (cart, order lifecycle)
//! └── ValidationError  - input validation failures, pre-everything
//!
//! rxpos-client
//! └── ClientError      - wraps CoreError, adds network taxonomy
//! ```
//!
//! Validation errors are raised synchronously before any state is
//! touched; in particular an illegal status transition never reaches
//! the network layer.

use thiserror::Error;

use crate::purchase::OrderStatus;

/// Business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The cart has reached its maximum number of distinct lines.
    #[error("Cart cannot have more than {max} lines")]
    CartTooLarge { max: usize },

    /// A purchase order status change that the lifecycle does not allow.
    ///
    /// Raised locally, before any request is issued; `received` and
    /// `cancelled` are terminal and accept no further transitions.
    #[error("Invalid transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    /// A receive action referenced an item that is not on the order.
    #[error("Item {medicine_id} is not part of this purchase order")]
    UnknownOrderItem { medicine_id: i64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Input validation errors.
///
/// Raised at the boundary, before business logic runs. The pricing
/// calculator assumes its input already passed these checks.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format or non-finite number.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
