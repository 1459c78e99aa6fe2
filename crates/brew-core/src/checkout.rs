//! # Checkout Preparation
//!
//! Freezes a cart into the summary handed to the payment step.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::Cart;
use crate::error::{CartError, CoreResult};
use crate::money::Money;

/// What the payment step needs to know about a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSummary {
    pub cart_id: String,
    pub line_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
    pub promotion_code: Option<String>,
    pub promotion_name: Option<String>,
    /// Subscription lines need a signed-in member at payment time.
    pub has_subscription: bool,
}

/// Builds the checkout summary.
///
/// ## Errors
/// `EmptyCart` when the cart has no lines.
pub fn prepare_checkout(cart: &Cart) -> CoreResult<CheckoutSummary> {
    if cart.is_empty() {
        return Err(CartError::EmptyCart);
    }

    let promotion = cart.applied_promotion.as_ref();

    Ok(CheckoutSummary {
        cart_id: cart.id.clone(),
        line_count: cart.item_count(),
        total_quantity: cart.total_quantity(),
        subtotal: cart.subtotal,
        discount: cart.discount,
        total: cart.total,
        promotion_code: promotion.and_then(|p| p.code.clone()),
        promotion_name: promotion.map(|p| p.name.clone()),
        has_subscription: cart.items.iter().any(|i| i.is_subscription()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DiscountType, ProductSelection, Promotion, PromotionType};
    use chrono::Utc;

    #[test]
    fn test_empty_cart_cannot_check_out() {
        let cart = Cart::new();
        assert!(matches!(prepare_checkout(&cart), Err(CartError::EmptyCart)));
    }

    #[test]
    fn test_summary_reflects_cart() {
        let mut cart = Cart::new();
        cart.add_product(
            &ProductSelection {
                product_id: "guatemala".to_string(),
                product_name: "Guatemala Huehuetenango".to_string(),
                size: "12oz".to_string(),
                grind: "Drip".to_string(),
                price_cents: 1895,
                image_url: None,
            },
            2,
        )
        .unwrap();
        cart.apply_promotion(
            Promotion {
                code: Some("FIVEOFF".to_string()),
                name: "Five Off".to_string(),
                promotion_type: PromotionType::Manual,
                discount_type: DiscountType::FixedAmount,
                discount_value: 500,
                min_subtotal_cents: None,
                valid_until: None,
                is_active: true,
            },
            Utc::now(),
        )
        .unwrap();

        let summary = prepare_checkout(&cart).unwrap();
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.total_quantity, 2);
        assert_eq!(summary.subtotal.cents(), 3790);
        assert_eq!(summary.total.cents(), 3290);
        assert_eq!(summary.promotion_code.as_deref(), Some("FIVEOFF"));
        assert!(!summary.has_subscription);
    }
}
