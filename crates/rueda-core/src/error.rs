//! # Error Types
//!
//! Domain-specific error types for rueda-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rueda-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  rueda-store  └── StoreError   - Snapshot persistence failures         │
//! │  rueda-api    └── ApiError     - HTTP / backend failures               │
//! │  rueda-shell  └── CommandError - What callers see (code + message)     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CommandError → caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Business-rule failures always leave state unchanged; the caller only has to
//! show the message.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Adding or raising a quantity would go over the stock ceiling.
    ///
    /// ## User Workflow
    /// ```text
    /// Scan product (already 3 in cart, stock = 3)
    ///      │
    ///      ▼
    /// add_item → InsufficientStock { available: 3, requested: 4 }
    ///      │
    ///      ▼
    /// UI shows: "Only 3 of Casco MT Thunder in stock"
    /// ```
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        name: String,
        available: i64,
        requested: i64,
    },

    /// Product has no stock at all and cannot enter the cart.
    #[error("{name} is out of stock")]
    OutOfStock { product_id: String, name: String },

    /// The product is not a line of the current cart.
    #[error("Product {0} is not in the cart")]
    NotInCart(String),

    /// Checkout attempted on an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// A credit sale needs a client to carry the debt.
    #[error("A client must be selected for credit sales")]
    ClientRequired,

    /// Balance adjustment rejected.
    #[error("Invalid balance adjustment: {reason}")]
    InvalidBalanceAdjustment { reason: String },

    /// The logged-in user lacks the permission for the operation.
    #[error("{role} users cannot {action}")]
    PermissionDenied { role: String, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any network call, so nothing reaches the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn required(field: &str) -> Self {
        ValidationError::Required {
            field: field.to_string(),
        }
    }

    pub fn must_be_positive(field: &str) -> Self {
        ValidationError::MustBePositive {
            field: field.to_string(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
