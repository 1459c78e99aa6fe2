//! # Promotion Resolver
//!
//! Eligibility checks and discount arithmetic for promotions.
//!
//! ## Manual vs. Auto
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Promotion Precedence                               │
//! │                                                                         │
//! │  MANUAL (code entry)                 AUTO (ambient)                     │
//! │  ───────────────────                 ──────────────                     │
//! │  • Shopper types a code              • Scanned on every auto check      │
//! │  • Unknown / inactive / expired      • Best tier first: ordered by      │
//! │    → InvalidPromoCode                  minimum subtotal, descending     │
//! │  • Below minimum                     • Never replaces a manual promo    │
//! │    → PromoMinimumNotMet              • Dropped when cart stops          │
//! │  • Replaces whatever was applied       qualifying                       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Discount Formula
//! - Percentage: `floor(subtotal × pct / 100)`
//! - Fixed amount: `min(discount_value, subtotal)`

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CartError, CoreResult};
use crate::money::Money;
use crate::types::{DiscountType, Promotion};

// =============================================================================
// Discount Arithmetic
// =============================================================================

/// Computes the discount a promotion grants on `subtotal`.
///
/// The result is never negative and never larger than `subtotal`.
///
/// ## Example
/// ```rust
/// use brew_core::money::Money;
/// use brew_core::promotion::compute_discount;
/// use brew_core::types::{DiscountType, Promotion, PromotionType};
///
/// let ten_percent = Promotion {
///     code: Some("SPRING10".into()),
///     name: "Spring Sale".into(),
///     promotion_type: PromotionType::Manual,
///     discount_type: DiscountType::Percentage,
///     discount_value: 10,
///     min_subtotal_cents: None,
///     valid_until: None,
///     is_active: true,
/// };
/// assert_eq!(compute_discount(&ten_percent, Money::from_cents(1895)).cents(), 189);
/// ```
pub fn compute_discount(promotion: &Promotion, subtotal: Money) -> Money {
    if !subtotal.is_positive() || promotion.discount_value <= 0 {
        return Money::zero();
    }

    let discount = match promotion.discount_type {
        DiscountType::Percentage => {
            let pct = promotion.discount_value.clamp(0, 100) as u32;
            subtotal.percentage_floor(pct)
        }
        DiscountType::FixedAmount => Money::from_cents(promotion.discount_value),
    };

    discount.min(subtotal)
}

// =============================================================================
// Eligibility
// =============================================================================

/// Checks whether a promotion fetched by code may be applied.
///
/// ## Order of Checks
/// 1. Inactive or expired → `InvalidPromoCode` (indistinguishable from unknown)
/// 2. Subtotal below minimum → `PromoMinimumNotMet`
pub fn check_eligibility(
    promotion: &Promotion,
    subtotal: Money,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    if !promotion.is_live(now) {
        return Err(CartError::invalid_promo(promotion.label()));
    }

    if !promotion.meets_minimum(subtotal) {
        return Err(CartError::PromoMinimumNotMet {
            minimum: promotion.min_subtotal(),
            subtotal,
        });
    }

    Ok(())
}

/// Picks the auto promotion a cart with `subtotal` qualifies for.
///
/// Candidates that are not auto, not live, or whose minimum is not met are
/// skipped. The rest are ordered by minimum subtotal descending (no minimum
/// counts as zero) and the first is returned, so the richest tier wins. Ties
/// keep catalog order. An empty cart qualifies for nothing.
pub fn select_auto_promotion<'a>(
    candidates: &'a [Promotion],
    subtotal: Money,
    now: DateTime<Utc>,
) -> Option<&'a Promotion> {
    if !subtotal.is_positive() {
        return None;
    }

    let mut eligible: Vec<&Promotion> = candidates
        .iter()
        .filter(|p| p.is_auto() && p.is_live(now))
        .collect();

    // Stable sort: equal thresholds keep catalog order.
    eligible.sort_by(|a, b| b.min_subtotal().cmp(&a.min_subtotal()));

    eligible.into_iter().find(|p| p.meets_minimum(subtotal))
}

// =============================================================================
// Auto Check Outcome
// =============================================================================

/// What an auto-promotion check did to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "promotion", rename_all = "snake_case")]
pub enum AutoPromotionOutcome {
    /// Nothing changed.
    Unchanged,
    /// A manual promotion is applied; auto promotions were not considered.
    KeptManual,
    /// This auto promotion is now applied.
    Applied(Promotion),
    /// This stale auto promotion was removed.
    Removed(Promotion),
}

impl AutoPromotionOutcome {
    /// True when the cart's promotion changed.
    pub fn changed(&self) -> bool {
        matches!(
            self,
            AutoPromotionOutcome::Applied(_) | AutoPromotionOutcome::Removed(_)
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
