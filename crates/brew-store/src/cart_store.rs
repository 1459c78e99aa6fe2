//! # Cart Store
//!
//! The single live cart shared by every view, with persistence and change
//! broadcast wrapped around the pure transitions in `brew-core`.
//!
//! ## Operation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    CartStore Operations                                 │
//! │                                                                         │
//! │  Caller                 CartStore                      Side effects     │
//! │  ──────                 ─────────                      ────────────     │
//! │                                                                         │
//! │  add_to_cart() ───────► lock ► Cart::add_product ► unlock               │
//! │                         (auto promotions enabled?)                      │
//! │                           └─► catalog.auto_promotions().await           │
//! │                               lock ► Cart::check_auto_promotions        │
//! │                         commit ──────────────────────► storage.save     │
//! │                                                  └───► events.publish   │
//! │                                                                         │
//! │  apply_promo_code() ──► normalize ► catalog.find_by_code().await        │
//! │                         lock ► Cart::apply_promotion ► commit           │
//! │                                                                         │
//! │  refresh() ───────────► storage.load ► replace cart ► publish           │
//! │                                                                         │
//! │  NOTE: The mutex is never held across an await point.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Persistence
//! Storage is best effort. A cart that cannot be loaded starts empty, and a
//! cart that cannot be saved stays authoritative in memory. Both are logged.

use std::sync::{Mutex, PoisonError};

use brew_core::validation::normalize_promo_code;
use brew_core::{
    prepare_checkout, AutoPromotionOutcome, BundleSelection, Cart, CartError, CartTotals,
    CheckoutSummary, CoreResult, ProductSelection, SubscriptionSelection,
    CART_STORAGE_KEY,
};
use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

use crate::catalog::PromotionCatalog;
use crate::config::StorefrontConfig;
use crate::error::StoreResult;
use crate::events::{CartEvent, CartEvents};
use crate::storage::CartStorage;

// =============================================================================
// Options
// =============================================================================

/// Runtime knobs for a [`CartStore`].
#[derive(Debug, Clone)]
pub struct CartStoreOptions {
    /// Storage key the cart lives under.
    pub cart_key: String,
    /// Reconcile auto promotions after every line item change.
    pub auto_promotions: bool,
    /// Capacity of the change broadcast channel.
    pub broadcast_capacity: usize,
}

impl Default for CartStoreOptions {
    fn default() -> Self {
        CartStoreOptions {
            cart_key: CART_STORAGE_KEY.to_string(),
            auto_promotions: true,
            broadcast_capacity: 64,
        }
    }
}

impl From<&StorefrontConfig> for CartStoreOptions {
    fn from(config: &StorefrontConfig) -> Self {
        CartStoreOptions {
            cart_key: config.cart_key().to_string(),
            auto_promotions: config.cart.auto_promotions,
            broadcast_capacity: config.events.broadcast_capacity,
        }
    }
}

// =============================================================================
// Cart Store
// =============================================================================

/// The live cart container.
pub struct CartStore<S, C> {
    cart: Mutex<Cart>,
    storage: S,
    catalog: C,
    events: CartEvents,
    options: CartStoreOptions,
}

impl<S, C> CartStore<S, C>
where
    S: CartStorage,
    C: PromotionCatalog,
{
    /// Opens the store, restoring the persisted cart if there is one.
    pub fn open(storage: S, catalog: C, options: CartStoreOptions) -> Self {
        let cart = load_cart(&storage, &options.cart_key);
        info!(
            cart_id = %cart.id,
            items = cart.item_count(),
            key = %options.cart_key,
            "Cart store opened"
        );

        CartStore {
            cart: Mutex::new(cart),
            events: CartEvents::new(options.broadcast_capacity),
            storage,
            catalog,
            options,
        }
    }

    // =========================================================================
    // Access
    // =========================================================================

    /// Executes a function with read access to the cart.
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&cart)
    }

    fn with_cart_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.cart.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut cart)
    }

    /// A copy of the current cart.
    pub fn cart(&self) -> Cart {
        self.with_cart(Cart::clone)
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(Cart::totals)
    }

    pub fn item_count(&self) -> usize {
        self.with_cart(Cart::item_count)
    }

    pub fn total_quantity(&self) -> i64 {
        self.with_cart(Cart::total_quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.with_cart(Cart::is_empty)
    }

    /// Receives every change made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    pub fn options(&self) -> &CartStoreOptions {
        &self.options
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Adds `quantity` of a product variant, merging with an existing line.
    pub async fn add_to_cart(
        &self,
        selection: &ProductSelection,
        quantity: i64,
    ) -> StoreResult<Cart> {
        debug!(
            product_id = %selection.product_id,
            size = %selection.size,
            grind = %selection.grind,
            quantity,
            "add_to_cart"
        );
        self.change_items(|cart| cart.add_product(selection, quantity))
            .await
    }

    /// Adds one bundle, merging with an existing line for the same grind.
    pub async fn add_bundle_to_cart(&self, bundle: &BundleSelection) -> StoreResult<Cart> {
        debug!(bundle_id = %bundle.bundle_id, grind = %bundle.grind, "add_bundle_to_cart");
        self.change_items(|cart| cart.add_bundle(bundle)).await
    }

    /// Adds one subscription, merging with an existing line for the same interval.
    pub async fn add_subscription_to_cart(
        &self,
        selection: &SubscriptionSelection,
    ) -> StoreResult<Cart> {
        debug!(
            product_id = %selection.product_id,
            interval = %selection.interval,
            "add_subscription_to_cart"
        );
        self.change_items(|cart| cart.add_subscription(selection))
            .await
    }

    pub async fn remove_from_cart(&self, id: &str) -> StoreResult<Cart> {
        debug!(item_id = %id, "remove_from_cart");
        self.change_items(|cart| cart.remove_item(id)).await
    }

    pub async fn update_quantity(&self, id: &str, quantity: i64) -> StoreResult<Cart> {
        debug!(item_id = %id, quantity, "update_quantity");
        self.change_items(|cart| cart.update_quantity(id, quantity))
            .await
    }

    /// Resets to a fresh empty cart.
    pub fn clear_cart(&self) -> Cart {
        self.with_cart_mut(Cart::clear);
        let cart = self.commit(CartEvent::Cleared);
        info!(cart_id = %cart.id, "Cart cleared");
        cart
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    /// Looks up `code` in the catalog and applies it.
    ///
    /// ## Errors
    /// - `Validation` for a blank or malformed code
    /// - `InvalidPromoCode` when unknown, inactive or expired
    /// - `PromoMinimumNotMet` when the subtotal is too low
    /// - `EmptyCart` when there is nothing to discount
    /// - `Catalog` when the content store cannot answer
    pub async fn apply_promo_code(&self, code: &str) -> StoreResult<Cart> {
        let code = normalize_promo_code(code).map_err(CartError::from)?;
        debug!(code = %code, "apply_promo_code");

        let promotion = self
            .catalog
            .find_by_code(&code)
            .await?
            .ok_or_else(|| CartError::invalid_promo(&code))?;

        let discount =
            self.with_cart_mut(|cart| cart.apply_promotion(promotion, Utc::now()))?;
        info!(code = %code, discount = %discount, "Promotion applied");

        Ok(self.commit(CartEvent::Updated))
    }

    /// Drops the applied promotion, if any.
    pub fn remove_promotion(&self) -> Cart {
        let removed = self.with_cart_mut(Cart::remove_promotion);
        if let Some(promotion) = &removed {
            info!(promotion = %promotion.label(), "Promotion removed");
        }
        self.commit(CartEvent::Updated)
    }

    /// Reconciles the cart with the catalog's auto promotions.
    pub async fn check_auto_promotions(&self) -> StoreResult<AutoPromotionOutcome> {
        let candidates = self.catalog.auto_promotions().await?;
        let outcome =
            self.with_cart_mut(|cart| cart.check_auto_promotions(&candidates, Utc::now()));
        log_outcome(&outcome);

        if outcome.changed() {
            self.commit(CartEvent::Updated);
        }
        Ok(outcome)
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    pub fn prepare_checkout(&self) -> StoreResult<CheckoutSummary> {
        let summary = self.with_cart(prepare_checkout)?;
        info!(
            cart_id = %summary.cart_id,
            total = %summary.total,
            "Checkout prepared"
        );
        Ok(summary)
    }

    // =========================================================================
    // Storage Sync
    // =========================================================================

    /// Replaces the in-memory cart with whatever storage holds now.
    ///
    /// Picks up changes written by another process sharing the storage.
    pub fn refresh(&self) -> Cart {
        let loaded = load_cart(&self.storage, &self.options.cart_key);
        debug!(cart_id = %loaded.id, items = loaded.item_count(), "Cart refreshed from storage");

        self.with_cart_mut(|cart| *cart = loaded.clone());
        self.events.publish(CartEvent::Reloaded(loaded.clone()));
        loaded
    }

    // =========================================================================
    // Internals
    // =========================================================================

    async fn change_items<F, R>(&self, change: F) -> StoreResult<Cart>
    where
        F: FnOnce(&mut Cart) -> CoreResult<R>,
    {
        let dropped = self.with_cart_mut(|cart| {
            let before = cart.applied_promotion.clone();
            change(cart)?;
            Ok::<_, CartError>(before.filter(|_| cart.applied_promotion.is_none()))
        })?;

        if let Some(promotion) = dropped {
            info!(promotion = %promotion.label(), "Promotion no longer qualifies, removed");
        }

        if self.options.auto_promotions {
            self.reconcile_auto_promotions().await;
        }

        Ok(self.commit(CartEvent::Updated))
    }

    async fn reconcile_auto_promotions(&self) {
        let candidates = match self.catalog.auto_promotions().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(error = %e, "Auto promotions unavailable, keeping current promotion");
                return;
            }
        };

        let outcome =
            self.with_cart_mut(|cart| cart.check_auto_promotions(&candidates, Utc::now()));
        log_outcome(&outcome);
    }

    /// Persists the current cart and announces it.
    fn commit(&self, event: fn(Cart) -> CartEvent) -> Cart {
        let cart = self.cart();

        match serde_json::to_string(&cart) {
            Ok(json) => {
                if let Err(e) = self.storage.save(&self.options.cart_key, &json) {
                    error!(error = %e, key = %self.options.cart_key, "Failed to persist cart");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize cart"),
        }

        self.events.publish(event(cart.clone()));
        cart
    }
}

fn log_outcome(outcome: &AutoPromotionOutcome) {
    match outcome {
        AutoPromotionOutcome::Applied(promotion) => {
            info!(promotion = %promotion.label(), "Auto promotion applied")
        }
        AutoPromotionOutcome::Removed(promotion) => {
            info!(promotion = %promotion.label(), "Auto promotion removed")
        }
        AutoPromotionOutcome::KeptManual => debug!("Manual promotion kept"),
        AutoPromotionOutcome::Unchanged => debug!("Auto promotions unchanged"),
    }
}

/// Reads the persisted cart, degrading to a fresh one on any failure.
fn load_cart<S: CartStorage>(storage: &S, key: &str) -> Cart {
    let json = match storage.load(key) {
        Ok(Some(json)) => json,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(error = %e, key, "Cart storage unavailable, starting with an empty cart");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&json) {
        Ok(mut cart) => {
            // Stored totals are derived data
            let updated_at = cart.updated_at;
            cart.recalculate();
            cart.updated_at = updated_at;
            cart
        }
        Err(e) => {
            warn!(error = %e, key, "Stored cart is corrupt, discarding it");
            if let Err(e) = storage.remove(key) {
                warn!(error = %e, key, "Failed to discard corrupt cart");
            }
            Cart::new()
        }
    }
}
