//! # CLI Error Type
//!
//! Unified error type for commands: a machine-readable code plus the message
//! shown to the shopper.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  CartError ──────┐                                                      │
//! │                  ├──► CliError { code, message } ──► stderr, exit 1     │
//! │  StoreError ─────┘                                                      │
//! │                                                                         │
//! │  $ brew promo apply BOGUS                                               │
//! │  error[PROMO_ERROR]: Invalid or expired promo code: BOGUS               │
//! │                                                                         │
//! │  $ brew --json promo apply BOGUS                                        │
//! │  {"code":"PROMO_ERROR","message":"Invalid or expired promo code: BOGUS"}│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::CartError;
use brew_store::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error returned from a command.
#[derive(Debug, Clone, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Input validation failed
    ValidationError,

    /// Promo code rejected
    PromoError,

    /// Cart rule violated
    CartError,

    /// Line item not in cart
    NotFound,

    /// Cart storage failed
    StorageError,

    /// Content store failed
    CatalogError,

    /// Configuration rejected
    ConfigError,

    /// Anything else
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::PromoError => "PROMO_ERROR",
            ErrorCode::CartError => "CART_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::CatalogError => "CATALOG_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

/// Converts cart errors to CLI errors.
impl From<CartError> for CliError {
    fn from(err: CartError) -> Self {
        let code = match &err {
            CartError::ItemNotFound(_) => ErrorCode::NotFound,
            CartError::EmptyCart | CartError::CartTooLarge { .. } | CartError::LineConflict(_) => {
                ErrorCode::CartError
            }
            CartError::QuantityTooLarge { .. } | CartError::Validation(_) => {
                ErrorCode::ValidationError
            }
            e if e.is_promotion_error() => ErrorCode::PromoError,
            _ => ErrorCode::Internal,
        };
        CliError::new(code, err.to_string())
    }
}

/// Converts store errors to CLI errors.
impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Cart(e) => e.into(),
            StoreError::Storage(_) | StoreError::Io(_) | StoreError::Serialization(_) => {
                // Log the actual error but return a generic message
                tracing::error!("Cart storage failed: {}", err);
                CliError::new(ErrorCode::StorageError, "Cart storage is unavailable")
            }
            StoreError::Catalog(e) => {
                tracing::error!("Promotion lookup failed: {}", e);
                CliError::new(
                    ErrorCode::CatalogError,
                    "Promotions are unavailable right now, please try again",
                )
            }
            StoreError::InvalidConfig(_)
            | StoreError::ConfigParse(_)
            | StoreError::ConfigWrite(_) => CliError::new(ErrorCode::ConfigError, err.to_string()),
        }
    }
}

impl From<std::fmt::Error> for CliError {
    fn from(_: std::fmt::Error) -> Self {
        CliError::internal("Failed to render output")
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("Failed to render output: {}", err))
    }
}
