//! # Error Types
//!
//! Domain-specific error types for brew-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brew-core errors (this file)                                          │
//! │  ├── CartError        - Cart and promotion rule violations             │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  brew-store errors (separate crate)                                    │
//! │  └── StoreError       - Storage, catalog and config failures           │
//! │                                                                         │
//! │  brew-cli errors (in app)                                              │
//! │  └── CliError         - What the user sees (code + message)            │
//! │                                                                         │
//! │  Flow: ValidationError → CartError → StoreError → CliError → User      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant's `Display` is the user-facing message. None are retried.

use thiserror::Error;

use crate::money::Money;

// =============================================================================
// Cart Error
// =============================================================================

/// Cart and promotion errors.
#[derive(Debug, Error)]
pub enum CartError {
    /// The promo code is unknown, inactive or past its `valid_until`.
    ///
    /// ## User Workflow
    /// ```text
    /// Enter code "SPRING10"
    ///      │
    ///      ▼
    /// Content store lookup ──► not found / expired
    ///      │
    ///      ▼
    /// InvalidPromoCode { code: "SPRING10" }
    ///      │
    ///      ▼
    /// UI shows: "Invalid or expired promo code: SPRING10"
    /// ```
    #[error("Invalid or expired promo code: {code}")]
    InvalidPromoCode { code: String },

    /// The cart subtotal is below the promotion's minimum.
    #[error("This promotion requires a minimum subtotal of {minimum} (cart subtotal is {subtotal})")]
    PromoMinimumNotMet { minimum: Money, subtotal: Money },

    /// Checkout attempted with no items.
    #[error("Your cart is empty")]
    EmptyCart,

    /// No line item with the given id.
    #[error("Item not in cart: {0}")]
    ItemNotFound(String),

    /// Cart has reached the maximum number of distinct lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// A line with this id already holds a different selection.
    #[error("Cart line {0} already holds a different item")]
    LineConflict(String),

    /// Line quantity would exceed the maximum.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Input validation failed. The message is shown unchanged.
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl CartError {
    /// Creates an InvalidPromoCode error.
    pub fn invalid_promo(code: impl Into<String>) -> Self {
        CartError::InvalidPromoCode { code: code.into() }
    }

    /// True for errors raised while applying a promotion.
    pub fn is_promotion_error(&self) -> bool {
        matches!(
            self,
            CartError::InvalidPromoCode { .. } | CartError::PromoMinimumNotMet { .. }
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is below its minimum.
    #[error("{field} must be at least {min}")]
    BelowMinimum { field: String, min: i64 },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CartError.
pub type CoreResult<T> = Result<T, CartError>;
