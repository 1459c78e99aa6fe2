//! # Line Items
//!
//! One priced, quantified entry in a cart, plus the deterministic ids that
//! let repeated adds merge instead of duplicating.
//!
//! ## Line Identity
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Selection                              Line id                         │
//! │  ─────────                              ───────                         │
//! │  product  ethiopia / 12oz / "Whole Bean"  p:ethiopia:12oz:wholebean     │
//! │  product  ethiopia / 12oz / "whole bean"  p:ethiopia:12oz:wholebean  ◄  │
//! │  bundle   sampler / "Espresso"            b:sampler:espresso            │
//! │  sub      ethiopia / 12oz / drip / weekly s:ethiopia:12oz:drip:weekly   │
//! │                                                                         │
//! │  Grind is lowercased with whitespace removed before it joins the id.   │
//! │  Each part escapes `%` and `:`, so two different selections can never  │
//! │  produce the same id.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{
    BundleComponent, BundleSelection, ItemType, ProductSelection, SubscriptionInterval,
    SubscriptionSelection,
};

// =============================================================================
// Identity
// =============================================================================

/// Lowercases a grind descriptor and strips all whitespace.
pub fn normalize_grind(grind: &str) -> String {
    grind
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Escapes the id separator so a part can never be mistaken for two.
fn id_part(raw: &str) -> String {
    raw.replace('%', "%25").replace(':', "%3A")
}

/// Id of a product line.
pub fn product_line_id(product_id: &str, size: &str, grind: &str) -> String {
    format!(
        "p:{}:{}:{}",
        id_part(product_id),
        id_part(size),
        id_part(&normalize_grind(grind))
    )
}

/// Id of a bundle line.
pub fn bundle_line_id(bundle_id: &str, grind: &str) -> String {
    format!("b:{}:{}", id_part(bundle_id), id_part(&normalize_grind(grind)))
}

/// Id of a subscription line.
pub fn subscription_line_id(
    product_id: &str,
    size: &str,
    grind: &str,
    interval: SubscriptionInterval,
) -> String {
    format!(
        "s:{}:{}:{}:{}",
        id_part(product_id),
        id_part(size),
        id_part(&normalize_grind(grind)),
        interval
    )
}

// =============================================================================
// Detail Payloads
// =============================================================================

/// Extra data carried by bundle lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleDetails {
    pub bundle_id: String,
    pub components: Vec<BundleComponent>,
}

/// Extra data carried by subscription lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionDetails {
    pub interval: SubscriptionInterval,
}

// =============================================================================
// Line Item
// =============================================================================

/// An entry in the cart.
///
/// ## Invariants
/// - `quantity >= 1`
/// - `line_total == price_per_unit × quantity` (restored by [`LineItem::refresh_total`])
///
/// The price is frozen when the line is created; later catalog price changes
/// do not touch lines already in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: String,
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub grind: String,
    pub quantity: i64,
    pub price_per_unit: Money,
    pub line_total: Money,
    pub item_type: ItemType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleDetails>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<SubscriptionDetails>,
}

impl LineItem {
    /// Builds a product line.
    pub fn from_product(selection: &ProductSelection, quantity: i64) -> Self {
        let price = Money::from_cents(selection.price_cents);
        LineItem {
            id: product_line_id(&selection.product_id, &selection.size, &selection.grind),
            product_id: selection.product_id.clone(),
            product_name: selection.product_name.clone(),
            size: selection.size.clone(),
            grind: selection.grind.clone(),
            quantity,
            price_per_unit: price,
            line_total: price.multiply_quantity(quantity),
            item_type: ItemType::Product,
            image_url: selection.image_url.clone(),
            bundle: None,
            subscription: None,
        }
    }

    /// Builds a bundle line with quantity 1.
    pub fn from_bundle(bundle: &BundleSelection) -> Self {
        let price = Money::from_cents(bundle.price_cents);
        LineItem {
            id: bundle_line_id(&bundle.bundle_id, &bundle.grind),
            product_id: bundle.bundle_id.clone(),
            product_name: bundle.name.clone(),
            size: String::new(),
            grind: bundle.grind.clone(),
            quantity: 1,
            price_per_unit: price,
            line_total: price,
            item_type: ItemType::Bundle,
            image_url: bundle.image_url.clone(),
            bundle: Some(BundleDetails {
                bundle_id: bundle.bundle_id.clone(),
                components: bundle.components.clone(),
            }),
            subscription: None,
        }
    }

    /// Builds a subscription line with quantity 1.
    pub fn from_subscription(selection: &SubscriptionSelection) -> Self {
        let price = Money::from_cents(selection.price_cents);
        LineItem {
            id: subscription_line_id(
                &selection.product_id,
                &selection.size,
                &selection.grind,
                selection.interval,
            ),
            product_id: selection.product_id.clone(),
            product_name: selection.product_name.clone(),
            size: selection.size.clone(),
            grind: selection.grind.clone(),
            quantity: 1,
            price_per_unit: price,
            line_total: price,
            item_type: ItemType::Subscription,
            image_url: selection.image_url.clone(),
            bundle: None,
            subscription: Some(SubscriptionDetails {
                interval: selection.interval,
            }),
        }
    }

    /// Sets the quantity and recomputes the line total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.refresh_total();
    }

    /// Recomputes `line_total` from quantity and unit price.
    #[inline]
    pub fn refresh_total(&mut self) {
        self.line_total = self.price_per_unit.multiply_quantity(self.quantity);
    }

    /// True when both lines describe the same purchasable selection.
    pub fn same_selection(&self, other: &LineItem) -> bool {
        self.item_type == other.item_type
            && self.product_id == other.product_id
            && self.size == other.size
            && normalize_grind(&self.grind) == normalize_grind(&other.grind)
            && self.bundle.as_ref().map(|b| &b.bundle_id)
                == other.bundle.as_ref().map(|b| &b.bundle_id)
            && self.subscription == other.subscription
    }

    /// True for subscription lines.
    #[inline]
    pub fn is_subscription(&self) -> bool {
        self.item_type == ItemType::Subscription
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_grind() {
        assert_eq!(normalize_grind("Whole Bean"), "wholebean");
        assert_eq!(normalize_grind(" French  Press "), "frenchpress");
        assert_eq!(normalize_grind("ESPRESSO"), "espresso");
        assert_eq!(normalize_grind(""), "");
    }

    #[test]
    fn test_ids_ignore_grind_spelling() {
        assert_eq!(
            product_line_id("ethiopia", "12oz", "Whole Bean"),
            product_line_id("ethiopia", "12oz", "wholebean")
        );
        assert_ne!(
            product_line_id("ethiopia", "12oz", "Whole Bean"),
            product_line_id("ethiopia", "2lb", "Whole Bean")
        );
        assert_eq!(bundle_line_id("sampler", "Drip"), "b:sampler:drip");
        assert_eq!(
            subscription_line_id("colombia", "12oz", "Drip", SubscriptionInterval::Weekly),
            "s:colombia:12oz:drip:weekly"
        );
    }

    #[test]
    fn test_hyphenated_parts_do_not_collide() {
        assert_ne!(
            product_line_id("kenya-aa", "12oz", "Drip"),
            product_line_id("kenya", "aa-12oz", "Drip")
        );
        assert_ne!(
            product_line_id("kenya:aa", "12oz", "Drip"),
            product_line_id("kenya", "aa:12oz", "Drip")
        );
        assert_eq!(product_line_id("a:b", "50%", ""), "p:a%3Ab:50%25:");
    }

    #[test]
    fn test_line_kinds_do_not_collide() {
        assert_ne!(
            bundle_line_id("sampler", "Drip"),
            product_line_id("bundle", "sampler", "Drip")
        );
        assert_ne!(
            subscription_line_id("colombia", "12oz", "Drip", SubscriptionInterval::Weekly),
            product_line_id("sub-colombia", "12oz", "drip-weekly")
        );
    }

    #[test]
    fn test_set_quantity_refreshes_total() {
        let mut line = LineItem::from_product(
            &ProductSelection {
                product_id: "ethiopia".to_string(),
                product_name: "Ethiopia Yirgacheffe".to_string(),
                size: "12oz".to_string(),
                grind: "Whole Bean".to_string(),
                price_cents: 1895,
                image_url: None,
            },
            1,
        );
        line.set_quantity(4);
        assert_eq!(line.line_total.cents(), 7580);
    }

    #[test]
    fn test_bundle_line_carries_components() {
        let line = LineItem::from_bundle(&BundleSelection {
            bundle_id: "sampler".to_string(),
            name: "Origin Sampler".to_string(),
            grind: "Whole Bean".to_string(),
            price_cents: 4200,
            components: vec![BundleComponent {
                product_name: "Kenya AA".to_string(),
                size: "4oz".to_string(),
                quantity: 1,
            }],
            image_url: None,
        });
        assert_eq!(line.item_type, ItemType::Bundle);
        assert_eq!(line.quantity, 1);
        assert_eq!(line.bundle.as_ref().map(|b| b.components.len()), Some(1));
    }
}
