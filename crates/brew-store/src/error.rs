//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CartError (brew-core) ──┐                                              │
//! │  std::io::Error ─────────┤                                              │
//! │  serde_json::Error ──────┼──► StoreError (this module)                  │
//! │  toml errors ────────────┘          │                                   │
//! │                                     ▼                                   │
//! │                          CliError (in app) ──► user-facing message      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use brew_core::CartError;
use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error type.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A cart rule rejected the operation. Shown unchanged.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The key/value storage could not be used.
    #[error("Storage unavailable: {0}")]
    Storage(String),

    /// File system failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encode/decode failure.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The content store could not answer.
    #[error("Content store error: {0}")]
    Catalog(String),

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Config file is not valid TOML.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Config could not be rendered as TOML.
    #[error("Failed to write config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),
}

impl StoreError {
    /// Returns the cart error when this is one.
    pub fn as_cart_error(&self) -> Option<&CartError> {
        match self {
            StoreError::Cart(err) => Some(err),
            _ => None,
        }
    }
}
