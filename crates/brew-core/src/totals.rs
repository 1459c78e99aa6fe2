//! # Totals Calculator
//!
//! Pure recomputation of cart totals from line items and the applied
//! promotion.
//!
//! ```text
//! items ──► Σ line_total ──► subtotal ──┬──► compute_discount ──► discount
//!                                       │                            │
//!                                       └──────── max(0, s − d) ◄────┘
//!                                                      │
//!                                                      ▼
//!                                                    total
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::line_item::LineItem;
use crate::money::Money;
use crate::promotion::compute_discount;
use crate::types::Promotion;

/// Totals summary for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

/// Sum of all line totals.
pub fn calculate_subtotal(items: &[LineItem]) -> Money {
    items.iter().map(|i| i.line_total).sum()
}

/// Recomputes every total from scratch.
///
/// ## Invariant
/// `total == max(0, subtotal − discount)`
pub fn calculate_totals(items: &[LineItem], promotion: Option<&Promotion>) -> CartTotals {
    let subtotal = calculate_subtotal(items);
    let discount = promotion
        .map(|p| compute_discount(p, subtotal))
        .unwrap_or_default();

    CartTotals {
        item_count: items.len(),
        total_quantity: items.iter().map(|i| i.quantity).sum(),
        subtotal,
        discount,
        total: subtotal.clamped_sub(discount),
    }
}
