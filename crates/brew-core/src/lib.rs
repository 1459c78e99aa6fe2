//! # brew-core: Pure Cart Logic for the Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the cart
//! state transitions and pricing rules as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Cart Architecture                     │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Front end / brew-cli                            │   │
//! │  │   Product page ──► Cart drawer ──► Promo input ──► Checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        brew-store (CartStore, storage, catalog, events)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brew-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌───────────┐ ┌──────────────┐    │   │
//! │  │   │  money   │ │ line_item │ │   cart    │ │  promotion   │    │   │
//! │  │   │  Money   │ │ LineItem  │ │   Cart    │ │  resolver    │    │   │
//! │  │   └──────────┘ └───────────┘ └───────────┘ └──────────────┘    │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌───────────┐                     │   │
//! │  │   │  totals  │ │ checkout  │ │validation │                     │   │
//! │  │   └──────────┘ └───────────┘ └───────────┘                     │   │
//! │  │                                                                 │   │
//! │  │   NO STORAGE • NO NETWORK • PURE STATE TRANSITIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer arithmetic
//! - [`types`] - Promotions and add-to-cart selections
//! - [`line_item`] - Line items and their deterministic ids
//! - [`cart`] - The cart and its transitions
//! - [`promotion`] - Eligibility and discount arithmetic
//! - [`totals`] - Subtotal / discount / total calculator
//! - [`checkout`] - Checkout summary
//! - [`validation`] - Input validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use brew_core::{Cart, ProductSelection};
//!
//! let mut cart = Cart::new();
//! let selection = ProductSelection {
//!     product_id: "ethiopia-yirgacheffe".into(),
//!     product_name: "Ethiopia Yirgacheffe".into(),
//!     size: "12oz".into(),
//!     grind: "Whole Bean".into(),
//!     price_cents: 1895,
//!     image_url: None,
//! };
//!
//! cart.add_product(&selection, 1).unwrap();
//! cart.add_product(&selection, 1).unwrap(); // merges
//!
//! assert_eq!(cart.item_count(), 1);
//! assert_eq!(cart.total.cents(), 3790);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod checkout;
pub mod error;
pub mod line_item;
pub mod money;
pub mod promotion;
pub mod totals;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use checkout::{prepare_checkout, CheckoutSummary};
pub use error::{CartError, CoreResult, ValidationError};
pub use line_item::{BundleDetails, LineItem, SubscriptionDetails};
pub use money::Money;
pub use promotion::AutoPromotionOutcome;
pub use totals::CartTotals;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "brew-cart";

/// Maximum distinct lines in a single cart.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// Catches fat-fingered quantities (1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price accepted, in cents ($1,000,000).
///
/// Keeps `MAX_CART_ITEMS × MAX_ITEM_QUANTITY × price` well inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000;
