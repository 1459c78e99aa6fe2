//! # Cart
//!
//! The cart data structure and every state transition on it.
//!
//! ## Mutation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Cart Transitions                                 │
//! │                                                                         │
//! │  add_product / add_bundle / add_subscription                            │
//! │  remove_item / update_quantity / clear                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  line items change (merge by deterministic id)                          │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  recalculate()                                                          │
//! │   ├── refresh every line_total                                          │
//! │   ├── drop the applied promotion if it lapsed or its minimum is unmet   │
//! │   └── subtotal / discount / total                                       │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  updated_at = now                                                       │
//! │                                                                         │
//! │  apply_promotion / remove_promotion / check_auto_promotions             │
//! │        └──► same recalculate() tail                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Items are unique by `id`; a repeat add increments quantity.
//! - `line_total == price_per_unit × quantity` for every line.
//! - `total == max(0, subtotal − discount)`.
//! - At most one applied promotion.
//! - `check_auto_promotions` never replaces a manual promotion.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::{CartError, CoreResult};
use crate::line_item::LineItem;
use crate::money::Money;
use crate::promotion::{check_eligibility, select_auto_promotion, AutoPromotionOutcome};
use crate::totals::{calculate_subtotal, calculate_totals, CartTotals};
use crate::types::{BundleSelection, ProductSelection, Promotion, SubscriptionSelection};
use crate::validation::{validate_cart_size, validate_id, validate_price_cents, validate_quantity};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// The shopping cart, in the exact shape it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,

    /// Line items in insertion order.
    pub items: Vec<LineItem>,

    #[serde(default)]
    pub applied_promotion: Option<Promotion>,

    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        let now = Utc::now();
        Cart {
            id: Uuid::new_v4().to_string(),
            items: Vec::new(),
            applied_promotion: None,
            subtotal: Money::zero(),
            discount: Money::zero(),
            total: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    // =========================================================================
    // Line Item Mutations
    // =========================================================================

    /// Adds a product, merging with an existing line of the same
    /// product + size + grind.
    ///
    /// ## Returns
    /// The id of the line that was created or incremented.
    pub fn add_product(&mut self, selection: &ProductSelection, quantity: i64) -> CoreResult<String> {
        validate_id("Product id", &selection.product_id)?;
        validate_price_cents(selection.price_cents)?;
        validate_quantity(quantity)?;

        self.merge_line(LineItem::from_product(selection, quantity), quantity)
    }

    /// Adds one of a bundle. Repeat adds of the same bundle + grind increment
    /// the existing line by one.
    pub fn add_bundle(&mut self, bundle: &BundleSelection) -> CoreResult<String> {
        validate_id("Bundle id", &bundle.bundle_id)?;
        validate_price_cents(bundle.price_cents)?;

        self.merge_line(LineItem::from_bundle(bundle), 1)
    }

    /// Adds one subscription. Repeat adds of the same product + size + grind +
    /// interval increment the existing line by one.
    pub fn add_subscription(&mut self, selection: &SubscriptionSelection) -> CoreResult<String> {
        validate_id("Product id", &selection.product_id)?;
        validate_price_cents(selection.price_cents)?;

        self.merge_line(LineItem::from_subscription(selection), 1)
    }

    fn merge_line(&mut self, candidate: LineItem, increment: i64) -> CoreResult<String> {
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == candidate.id) {
            if !existing.same_selection(&candidate) {
                return Err(CartError::LineConflict(candidate.id));
            }
            let new_qty = existing.quantity + increment;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CartError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.set_quantity(new_qty);
            let id = existing.id.clone();
            self.recalculate();
            return Ok(id);
        }

        validate_cart_size(self.items.len()).map_err(|_| CartError::CartTooLarge {
            max: MAX_CART_ITEMS,
        })?;

        let id = candidate.id.clone();
        self.items.push(candidate);
        self.recalculate();
        Ok(id)
    }

    /// Removes a line by id and returns it.
    pub fn remove_item(&mut self, id: &str) -> CoreResult<LineItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        let removed = self.items.remove(index);
        self.recalculate();
        Ok(removed)
    }

    /// Sets the quantity of a line.
    ///
    /// ## Behavior
    /// - `qty < 1`: fails with "Quantity must be at least 1" (use
    ///   [`Cart::remove_item`] to delete a line)
    /// - `qty > 999`: fails
    /// - unknown id: `ItemNotFound`
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<()> {
        validate_quantity(quantity)?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CartError::ItemNotFound(id.to_string()))?;

        item.set_quantity(quantity);
        self.recalculate();
        Ok(())
    }

    /// Resets to an empty cart with a fresh id and no promotion.
    pub fn clear(&mut self) {
        *self = Cart::new();
    }

    // =========================================================================
    // Promotions
    // =========================================================================

    /// Applies a promotion fetched by code, replacing any applied promotion.
    ///
    /// ## Errors
    /// - `EmptyCart` when there is nothing to discount
    /// - `InvalidPromoCode` when inactive or expired at `now`
    /// - `PromoMinimumNotMet` when the subtotal is below the minimum
    ///
    /// ## Returns
    /// The discount now in effect.
    pub fn apply_promotion(&mut self, promotion: Promotion, now: DateTime<Utc>) -> CoreResult<Money> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }
        check_eligibility(&promotion, self.subtotal, now)?;

        self.applied_promotion = Some(promotion);
        self.recalculate();
        Ok(self.discount)
    }

    /// Clears the applied promotion and returns it.
    pub fn remove_promotion(&mut self) -> Option<Promotion> {
        let removed = self.applied_promotion.take();
        self.recalculate();
        removed
    }

    /// Reconciles the applied promotion with the available auto promotions.
    ///
    /// ## Decision Table
    /// ```text
    /// applied        best qualifying auto     result
    /// ───────        ────────────────────     ──────
    /// manual         (not consulted)          KeptManual
    /// none           none                     Unchanged
    /// none           A                        Applied(A)
    /// auto A         A                        Unchanged
    /// auto A         B                        Applied(B)
    /// auto A         none                     Removed(A)
    /// ```
    pub fn check_auto_promotions(
        &mut self,
        candidates: &[Promotion],
        now: DateTime<Utc>,
    ) -> AutoPromotionOutcome {
        if self.applied_promotion.as_ref().is_some_and(Promotion::is_manual) {
            return AutoPromotionOutcome::KeptManual;
        }

        let best = select_auto_promotion(candidates, self.subtotal, now).cloned();

        match (self.applied_promotion.take(), best) {
            (Some(current), Some(best)) if current.same_offer(&best) => {
                // Keep the fresher document (value may have been edited)
                self.applied_promotion = Some(best);
                self.recalculate();
                AutoPromotionOutcome::Unchanged
            }
            (_, Some(best)) => {
                self.applied_promotion = Some(best.clone());
                self.recalculate();
                AutoPromotionOutcome::Applied(best)
            }
            (Some(stale), None) => {
                self.recalculate();
                AutoPromotionOutcome::Removed(stale)
            }
            (None, None) => AutoPromotionOutcome::Unchanged,
        }
    }

    // =========================================================================
    // Recalculation
    // =========================================================================

    /// Restores every invariant after a change.
    ///
    /// Refreshes line totals, drops an applied promotion that was deactivated,
    /// expired or whose minimum is no longer met, recomputes
    /// subtotal/discount/total and bumps `updated_at`.
    ///
    /// ## Returns
    /// The promotion that was dropped, if any.
    pub fn recalculate(&mut self) -> Option<Promotion> {
        for item in &mut self.items {
            item.refresh_total();
        }

        let now = Utc::now();
        let mut dropped = None;
        let subtotal = calculate_subtotal(&self.items);
        if let Some(promotion) = &self.applied_promotion {
            if self.items.is_empty()
                || !promotion.is_live(now)
                || !promotion.meets_minimum(subtotal)
            {
                dropped = self.applied_promotion.take();
            }
        }

        let totals = calculate_totals(&self.items, self.applied_promotion.as_ref());
        self.subtotal = totals.subtotal;
        self.discount = totals.discount;
        self.total = totals.total;
        self.updated_at = now;

        dropped
    }

    // =========================================================================
    // Read Models
    // =========================================================================

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// True when the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up a line by id.
    pub fn find_item(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Totals view for responses.
    pub fn totals(&self) -> CartTotals {
        CartTotals {
            item_count: self.item_count(),
            total_quantity: self.total_quantity(),
            subtotal: self.subtotal,
            discount: self.discount,
            total: self.total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::line_item::product_line_id;
    use crate::promotion::AutoPromotionOutcome;
    use crate::types::{
        BundleComponent, DiscountType, PromotionType, SubscriptionInterval,
    };
    use chrono::Duration;

    fn ethiopia(grind: &str) -> ProductSelection {
        ProductSelection {
            product_id: "ethiopia-yirgacheffe".to_string(),
            product_name: "Ethiopia Yirgacheffe".to_string(),
            size: "12oz".to_string(),
            grind: grind.to_string(),
            price_cents: 1895,
            image_url: None,
        }
    }

    fn sampler() -> BundleSelection {
        BundleSelection {
            bundle_id: "origin-sampler".to_string(),
            name: "Origin Sampler".to_string(),
            grind: "Whole Bean".to_string(),
            price_cents: 4200,
            components: vec![BundleComponent {
                product_name: "Kenya AA".to_string(),
                size: "4oz".to_string(),
                quantity: 1,
            }],
            image_url: None,
        }
    }

    fn promo(
        code: Option<&str>,
        promotion_type: PromotionType,
        discount_type: DiscountType,
        value: i64,
        min: Option<i64>,
    ) -> Promotion {
        Promotion {
            code: code.map(str::to_string),
            name: code.unwrap_or("Auto Deal").to_string(),
            promotion_type,
            discount_type,
            discount_value: value,
            min_subtotal_cents: min,
            valid_until: None,
            is_active: true,
        }
    }

    fn assert_invariants(cart: &Cart) {
        for item in &cart.items {
            assert_eq!(item.line_total, item.price_per_unit * item.quantity);
            assert!(item.quantity >= 1);
        }
        assert_eq!(cart.total, cart.subtotal.clamped_sub(cart.discount));
        assert!(!cart.total.is_negative());
    }

    #[test]
    fn test_repeat_adds_accumulate() {
        let mut cart = Cart::new();

        let first = cart.add_product(&ethiopia("Whole Bean"), 1).unwrap();
        let second = cart.add_product(&ethiopia("whole bean"), 2).unwrap();
        let third = cart.add_product(&ethiopia(" WholeBean "), 3).unwrap();

        assert_eq!(first, second);
        assert_eq!(second, third);
        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].quantity, 6);
        assert_eq!(cart.items[0].line_total.cents(), 1895 * 6);
        assert_invariants(&cart);
    }

    #[test]
    fn test_different_grinds_are_distinct_lines() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Whole Bean"), 1).unwrap();
        cart.add_product(&ethiopia("Espresso"), 1).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.items[0].grind, "Whole Bean");
        assert_eq!(cart.items[1].grind, "Espresso");
        assert_eq!(cart.subtotal.cents(), 3790);
    }

    #[test]
    fn test_add_rejects_bad_quantity() {
        let mut cart = Cart::new();
        let err = cart.add_product(&ethiopia("Drip"), 0).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be at least 1");
        assert!(cart.is_empty());
    }

    #[test]
    fn test_merge_respects_max_quantity() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), MAX_ITEM_QUANTITY).unwrap();
        let err = cart.add_product(&ethiopia("Drip"), 1).unwrap_err();
        assert!(matches!(err, CartError::QuantityTooLarge { .. }));
        assert_eq!(cart.items[0].quantity, MAX_ITEM_QUANTITY);
    }

    #[test]
    fn test_cart_size_limit() {
        let mut cart = Cart::new();
        for n in 0..MAX_CART_ITEMS {
            let mut selection = ethiopia("Drip");
            selection.product_id = format!("coffee-{}", n);
            cart.add_product(&selection, 1).unwrap();
        }
        let err = cart.add_product(&ethiopia("Drip"), 1).unwrap_err();
        assert!(matches!(err, CartError::CartTooLarge { max } if max == MAX_CART_ITEMS));
    }

    #[test]
    fn test_bundle_repeat_add_increments() {
        let mut cart = Cart::new();
        cart.add_bundle(&sampler()).unwrap();
        let id = cart.add_bundle(&sampler()).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.find_item(&id).map(|i| i.quantity), Some(2));
        assert_eq!(cart.subtotal.cents(), 8400);
    }

    #[test]
    fn test_subscription_lines_are_separate_from_products() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.add_subscription(&SubscriptionSelection {
            product_id: "ethiopia-yirgacheffe".to_string(),
            product_name: "Ethiopia Yirgacheffe".to_string(),
            size: "12oz".to_string(),
            grind: "Drip".to_string(),
            price_cents: 1700,
            interval: SubscriptionInterval::Monthly,
            image_url: None,
        })
        .unwrap();

        assert_eq!(cart.item_count(), 2);
        assert!(cart.items[1].is_subscription());
        assert_eq!(cart.subtotal.cents(), 3595);
    }

    #[test]
    fn test_hyphenated_products_stay_on_separate_lines() {
        let mut cart = Cart::new();
        let mut kenya_aa = ethiopia("Drip");
        kenya_aa.product_id = "kenya-aa".to_string();
        let mut kenya = ethiopia("Drip");
        kenya.product_id = "kenya".to_string();
        kenya.size = "aa-12oz".to_string();
        kenya.price_cents = 2400;

        let first = cart.add_product(&kenya_aa, 1).unwrap();
        let second = cart.add_product(&kenya, 1).unwrap();

        assert_ne!(first, second);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.find_item(&second).map(|i| i.price_per_unit.cents()), Some(2400));
        assert_eq!(cart.subtotal.cents(), 4295);
    }

    #[test]
    fn test_product_named_bundle_does_not_merge_into_bundle() {
        let mut cart = Cart::new();
        cart.add_bundle(&sampler()).unwrap();
        let mut lookalike = ethiopia("Whole Bean");
        lookalike.product_id = "bundle".to_string();
        lookalike.size = "origin-sampler".to_string();

        cart.add_product(&lookalike, 1).unwrap();

        assert_eq!(cart.item_count(), 2);
        assert!(cart.items.iter().all(|i| i.quantity == 1));
    }

    #[test]
    fn test_merge_refuses_mismatched_line() {
        let mut cart = Cart::new();
        let mut stored = LineItem::from_bundle(&sampler());
        stored.id = product_line_id("ethiopia-yirgacheffe", "12oz", "Drip");
        cart.items.push(stored);
        cart.recalculate();

        let err = cart.add_product(&ethiopia("Drip"), 1).unwrap_err();
        assert!(matches!(err, CartError::LineConflict(_)));
        assert_eq!(cart.items[0].quantity, 1);
        assert_eq!(cart.subtotal.cents(), 4200);
    }

    #[test]
    fn test_add_rejects_absurd_price() {
        let mut cart = Cart::new();
        let mut selection = ethiopia("Drip");
        selection.price_cents = i64::MAX / 2;

        let err = cart.add_product(&selection, 3).unwrap_err();
        assert!(matches!(err, CartError::Validation(ValidationError::OutOfRange { .. })));
        assert!(cart.is_empty());
        assert_eq!(cart.total.cents(), 0);
    }

    #[test]
    fn test_update_quantity() {
        let mut cart = Cart::new();
        let id = cart.add_product(&ethiopia("Drip"), 1).unwrap();

        cart.update_quantity(&id, 4).unwrap();
        assert_eq!(cart.subtotal.cents(), 7580);

        let err = cart.update_quantity(&id, 0).unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be at least 1");
        assert_eq!(cart.items[0].quantity, 4);

        assert!(matches!(
            cart.update_quantity("missing", 2),
            Err(CartError::ItemNotFound(_))
        ));
        assert_invariants(&cart);
    }

    #[test]
    fn test_removing_only_item_zeroes_totals() {
        let mut cart = Cart::new();
        let id = cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.apply_promotion(
            promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
            Utc::now(),
        )
        .unwrap();

        let removed = cart.remove_item(&id).unwrap();
        assert_eq!(removed.id, id);
        assert!(cart.subtotal.is_zero());
        assert!(cart.discount.is_zero());
        assert!(cart.total.is_zero());
        assert!(cart.applied_promotion.is_none());
    }

    #[test]
    fn test_promotion_on_empty_cart() {
        let mut cart = Cart::new();
        let err = cart
            .apply_promotion(
                promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
                Utc::now(),
            )
            .unwrap_err();
        assert!(matches!(err, CartError::EmptyCart));
    }

    #[test]
    fn test_remove_unknown_item() {
        let mut cart = Cart::new();
        assert!(matches!(cart.remove_item("nope"), Err(CartError::ItemNotFound(_))));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        let original_id = cart.id.clone();
        cart.add_product(&ethiopia("Drip"), 2).unwrap();
        cart.clear();

        assert!(cart.is_empty());
        assert!(cart.total.is_zero());
        assert!(cart.applied_promotion.is_none());
        assert_ne!(cart.id, original_id);
    }

    #[test]
    fn test_percentage_promotion_on_1895() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();

        let discount = cart
            .apply_promotion(
                promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
                Utc::now(),
            )
            .unwrap();

        assert_eq!(discount.cents(), 189);
        assert_eq!(cart.total.cents(), 1706);
        assert_invariants(&cart);
    }

    #[test]
    fn test_fixed_promotion_on_1895() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();

        cart.apply_promotion(
            promo(Some("FIVEOFF"), PromotionType::Manual, DiscountType::FixedAmount, 500, None),
            Utc::now(),
        )
        .unwrap();

        assert_eq!(cart.discount.cents(), 500);
        assert_eq!(cart.total.cents(), 1395);
    }

    #[test]
    fn test_minimum_not_met_leaves_cart_untouched() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();

        let err = cart
            .apply_promotion(
                promo(Some("BIG30"), PromotionType::Manual, DiscountType::FixedAmount, 500, Some(3000)),
                Utc::now(),
            )
            .unwrap_err();

        assert!(matches!(err, CartError::PromoMinimumNotMet { .. }));
        assert!(cart.applied_promotion.is_none());
        assert_eq!(cart.total.cents(), 1895);
    }

    #[test]
    fn test_expired_promotion_is_invalid() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();
        let now = Utc::now();
        let mut expired =
            promo(Some("OLD"), PromotionType::Manual, DiscountType::Percentage, 10, None);
        expired.valid_until = Some(now - Duration::days(2));

        assert!(matches!(
            cart.apply_promotion(expired, now),
            Err(CartError::InvalidPromoCode { ref code }) if code == "OLD"
        ));
    }

    #[test]
    fn test_promotion_dropped_when_cart_shrinks_below_minimum() {
        let mut cart = Cart::new();
        let id = cart.add_product(&ethiopia("Drip"), 2).unwrap(); // 3790
        cart.apply_promotion(
            promo(Some("BIG30"), PromotionType::Manual, DiscountType::FixedAmount, 500, Some(3000)),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(cart.total.cents(), 3290);

        cart.update_quantity(&id, 1).unwrap();
        assert!(cart.applied_promotion.is_none());
        assert_eq!(cart.total.cents(), 1895);
    }

    #[test]
    fn test_promotion_dropped_once_expired() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.apply_promotion(
            promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
            Utc::now(),
        )
        .unwrap();
        assert_eq!(cart.discount.cents(), 189);

        if let Some(applied) = cart.applied_promotion.as_mut() {
            applied.valid_until = Some(Utc::now() - Duration::minutes(1));
        }
        cart.add_product(&ethiopia("Drip"), 1).unwrap();

        assert!(cart.applied_promotion.is_none());
        assert_eq!(cart.discount.cents(), 0);
        assert_eq!(cart.total.cents(), 3790);
        assert_invariants(&cart);
    }

    #[test]
    fn test_deactivated_promotion_is_dropped_on_recalculate() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.apply_promotion(
            promo(Some("FIVEOFF"), PromotionType::Manual, DiscountType::FixedAmount, 500, None),
            Utc::now(),
        )
        .unwrap();

        if let Some(applied) = cart.applied_promotion.as_mut() {
            applied.is_active = false;
        }
        let dropped = cart.recalculate();

        assert_eq!(dropped.and_then(|p| p.code).as_deref(), Some("FIVEOFF"));
        assert!(cart.applied_promotion.is_none());
        assert_eq!(cart.total.cents(), 1895);
    }

    #[test]
    fn test_discount_follows_subtotal() {
        let mut cart = Cart::new();
        let id = cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.apply_promotion(
            promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
            Utc::now(),
        )
        .unwrap();

        cart.update_quantity(&id, 2).unwrap(); // 3790 → 379
        assert_eq!(cart.discount.cents(), 379);
        assert_eq!(cart.total.cents(), 3411);
    }

    #[test]
    fn test_remove_promotion() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();
        cart.apply_promotion(
            promo(Some("FIVEOFF"), PromotionType::Manual, DiscountType::FixedAmount, 500, None),
            Utc::now(),
        )
        .unwrap();

        let removed = cart.remove_promotion();
        assert_eq!(removed.and_then(|p| p.code), Some("FIVEOFF".to_string()));
        assert!(cart.discount.is_zero());
        assert_eq!(cart.total.cents(), 1895);
    }

    #[test]
    fn test_auto_promotion_never_replaces_manual() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 5).unwrap();
        cart.apply_promotion(
            promo(Some("FIVEOFF"), PromotionType::Manual, DiscountType::FixedAmount, 500, None),
            Utc::now(),
        )
        .unwrap();

        let autos = vec![promo(None, PromotionType::Auto, DiscountType::Percentage, 50, None)];
        let outcome = cart.check_auto_promotions(&autos, Utc::now());

        assert_eq!(outcome, AutoPromotionOutcome::KeptManual);
        assert_eq!(
            cart.applied_promotion.as_ref().and_then(|p| p.code.as_deref()),
            Some("FIVEOFF")
        );
        assert_eq!(cart.discount.cents(), 500);
    }

    #[test]
    fn test_auto_promotion_lifecycle() {
        let mut cart = Cart::new();
        let now = Utc::now();
        let mut tier = promo(None, PromotionType::Auto, DiscountType::FixedAmount, 300, Some(3000));
        tier.name = "Three Off Thirty".to_string();
        let autos = vec![tier];

        let id = cart.add_product(&ethiopia("Drip"), 1).unwrap();
        assert_eq!(cart.check_auto_promotions(&autos, now), AutoPromotionOutcome::Unchanged);

        cart.update_quantity(&id, 2).unwrap();
        let outcome = cart.check_auto_promotions(&autos, now);
        assert!(matches!(outcome, AutoPromotionOutcome::Applied(ref p) if p.name == "Three Off Thirty"));
        assert_eq!(cart.total.cents(), 3490);

        // Same offer again: no change
        assert_eq!(cart.check_auto_promotions(&autos, now), AutoPromotionOutcome::Unchanged);

        // Stale auto promotion is removed when the catalog no longer offers it
        let outcome = cart.check_auto_promotions(&[], now);
        assert!(matches!(outcome, AutoPromotionOutcome::Removed(_)));
        assert!(cart.applied_promotion.is_none());
        assert_eq!(cart.total.cents(), 3790);
    }

    #[test]
    fn test_auto_promotion_upgrades_tier() {
        let mut cart = Cart::new();
        let now = Utc::now();
        let mut low = promo(None, PromotionType::Auto, DiscountType::FixedAmount, 100, Some(1000));
        low.name = "Low".to_string();
        let mut high = promo(None, PromotionType::Auto, DiscountType::FixedAmount, 700, Some(5000));
        high.name = "High".to_string();
        let autos = vec![low, high];

        let id = cart.add_product(&ethiopia("Drip"), 1).unwrap();
        assert!(matches!(
            cart.check_auto_promotions(&autos, now),
            AutoPromotionOutcome::Applied(ref p) if p.name == "Low"
        ));

        cart.update_quantity(&id, 3).unwrap(); // 5685
        assert!(matches!(
            cart.check_auto_promotions(&autos, now),
            AutoPromotionOutcome::Applied(ref p) if p.name == "High"
        ));
        assert_eq!(cart.discount.cents(), 700);
    }

    #[test]
    fn test_manual_code_replaces_auto() {
        let mut cart = Cart::new();
        let now = Utc::now();
        cart.add_product(&ethiopia("Drip"), 2).unwrap();
        cart.check_auto_promotions(
            &[promo(None, PromotionType::Auto, DiscountType::FixedAmount, 100, None)],
            now,
        );
        assert!(cart.applied_promotion.as_ref().is_some_and(Promotion::is_auto));

        cart.apply_promotion(
            promo(Some("SPRING10"), PromotionType::Manual, DiscountType::Percentage, 10, None),
            now,
        )
        .unwrap();
        assert!(cart.applied_promotion.as_ref().is_some_and(Promotion::is_manual));
        assert_eq!(cart.discount.cents(), 379);
    }

    #[test]
    fn test_json_round_trip_keeps_iso_dates() {
        let mut cart = Cart::new();
        cart.add_product(&ethiopia("Drip"), 1).unwrap();

        let json = serde_json::to_value(&cart).unwrap();
        assert!(json["createdAt"].as_str().is_some_and(|s| s.contains('T')));
        assert_eq!(json["items"][0]["lineTotal"], 1895);
        assert_eq!(json["items"][0]["itemType"], "product");

        let restored: Cart = serde_json::from_value(json).unwrap();
        assert_eq!(restored, cart);
    }
}
