//! # Domain Types
//!
//! Promotions and the selection payloads the storefront sends when a shopper
//! adds something to the cart.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌────────────────┐  │
//! │  │  ProductSelection   │  │  BundleSelection    │  │ Subscription-  │  │
//! │  │  ─────────────────  │  │  ─────────────────  │  │ Selection      │  │
//! │  │  product_id         │  │  bundle_id          │  │ ────────────── │  │
//! │  │  size, grind        │  │  grind              │  │ + interval     │  │
//! │  │  price_cents        │  │  components         │  │                │  │
//! │  └─────────────────────┘  └─────────────────────┘  └────────────────┘  │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐                       │
//! │  │     Promotion       │  │   PromotionType     │                       │
//! │  │  ─────────────────  │  │  Manual (by code)   │                       │
//! │  │  code (None = auto) │  │  Auto (ambient)     │                       │
//! │  │  discount_type      │  ├─────────────────────┤                       │
//! │  │  discount_value     │  │   DiscountType      │                       │
//! │  │  min_subtotal_cents │  │  Percentage         │                       │
//! │  │  valid_until        │  │  FixedAmount        │                       │
//! │  └─────────────────────┘  └─────────────────────┘                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Promotion Enums
// =============================================================================

/// How a promotion reaches the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PromotionType {
    /// Applied only when the shopper enters its code.
    #[default]
    Manual,
    /// Applied automatically when the cart qualifies.
    Auto,
}

/// How a promotion's `discount_value` is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    /// `discount_value` is whole percent points (10 = 10%).
    Percentage,
    /// `discount_value` is cents.
    FixedAmount,
}

// =============================================================================
// Promotion
// =============================================================================

/// A promotion document as published by the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    /// Code the shopper types. `None` for auto promotions.
    #[serde(default)]
    pub code: Option<String>,

    /// Display name ("Spring Sale", "Free Shipping Threshold").
    pub name: String,

    /// Manual or auto.
    #[serde(rename = "type", default)]
    pub promotion_type: PromotionType,

    /// Percentage or fixed amount.
    pub discount_type: DiscountType,

    /// Percent points or cents, depending on `discount_type`.
    pub discount_value: i64,

    /// Minimum cart subtotal in cents.
    #[serde(default)]
    pub min_subtotal_cents: Option<i64>,

    /// Expiry instant. `None` never expires.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub valid_until: Option<DateTime<Utc>>,

    /// Inactive promotions behave as if they did not exist.
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Promotion {
    /// Returns true for auto promotions.
    #[inline]
    pub fn is_auto(&self) -> bool {
        self.promotion_type == PromotionType::Auto
    }

    /// Returns true for manual (code-entry) promotions.
    #[inline]
    pub fn is_manual(&self) -> bool {
        self.promotion_type == PromotionType::Manual
    }

    /// Minimum subtotal as Money (zero when unset).
    #[inline]
    pub fn min_subtotal(&self) -> Money {
        Money::from_cents(self.min_subtotal_cents.unwrap_or(0))
    }

    /// True when `valid_until` lies strictly before `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.valid_until.is_some_and(|until| until < now)
    }

    /// True when the promotion is active and not expired.
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active && !self.is_expired(now)
    }

    /// True when `subtotal` reaches the minimum (or no minimum is set).
    pub fn meets_minimum(&self, subtotal: Money) -> bool {
        subtotal >= self.min_subtotal()
    }

    /// Two promotions are the same offer when code, name and type match.
    pub fn same_offer(&self, other: &Promotion) -> bool {
        self.code == other.code
            && self.name == other.name
            && self.promotion_type == other.promotion_type
    }

    /// Label shown next to the discount line: the code, or the name for autos.
    pub fn label(&self) -> &str {
        self.code.as_deref().unwrap_or(&self.name)
    }
}

// =============================================================================
// Line Item Type
// =============================================================================

/// What kind of thing a line item sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Product,
    Bundle,
    Subscription,
}

// =============================================================================
// Subscription Interval
// =============================================================================

/// Delivery cadence of a subscription line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionInterval {
    Weekly,
    Biweekly,
    Monthly,
}

impl fmt::Display for SubscriptionInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubscriptionInterval::Weekly => write!(f, "weekly"),
            SubscriptionInterval::Biweekly => write!(f, "biweekly"),
            SubscriptionInterval::Monthly => write!(f, "monthly"),
        }
    }
}

impl std::str::FromStr for SubscriptionInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "weekly" => Ok(SubscriptionInterval::Weekly),
            "biweekly" | "every-two-weeks" => Ok(SubscriptionInterval::Biweekly),
            "monthly" => Ok(SubscriptionInterval::Monthly),
            other => Err(format!(
                "Unknown interval: '{}'. Valid options: weekly, biweekly, monthly",
                other
            )),
        }
    }
}

// =============================================================================
// Selections
// =============================================================================

/// A single product the shopper picked on a product page.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductSelection {
    pub product_id: String,
    pub product_name: String,
    /// Bag size descriptor ("12oz", "2lb").
    pub size: String,
    /// Grind descriptor as displayed ("Whole Bean", "French Press").
    pub grind: String,
    pub price_cents: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// One product inside a bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleComponent {
    pub product_name: String,
    pub size: String,
    pub quantity: i64,
}

/// A bundle the shopper picked, with one grind for all its coffees.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BundleSelection {
    pub bundle_id: String,
    pub name: String,
    pub grind: String,
    pub price_cents: i64,
    #[serde(default)]
    pub components: Vec<BundleComponent>,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// A recurring delivery of one product.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionSelection {
    pub product_id: String,
    pub product_name: String,
    pub size: String,
    pub grind: String,
    /// Price per delivery, in cents.
    pub price_cents: i64,
    pub interval: SubscriptionInterval,
    #[serde(default)]
    pub image_url: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn promo(min: Option<i64>, valid_until: Option<DateTime<Utc>>) -> Promotion {
        Promotion {
            code: Some("SPRING10".to_string()),
            name: "Spring Sale".to_string(),
            promotion_type: PromotionType::Manual,
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            min_subtotal_cents: min,
            valid_until,
            is_active: true,
        }
    }

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        assert!(!promo(None, None).is_expired(now));
        assert!(promo(None, Some(now - Duration::days(1))).is_expired(now));
        assert!(!promo(None, Some(now + Duration::days(1))).is_expired(now));
    }

    #[test]
    fn test_minimum() {
        let p = promo(Some(3000), None);
        assert!(!p.meets_minimum(Money::from_cents(1895)));
        assert!(p.meets_minimum(Money::from_cents(3000)));
        assert!(promo(None, None).meets_minimum(Money::zero()));
    }

    #[test]
    fn test_promotion_json_shape() {
        let json = r#"{
            "code": null,
            "name": "Free Beans Friday",
            "type": "auto",
            "discountType": "fixed_amount",
            "discountValue": 500,
            "minSubtotalCents": 4000,
            "validUntil": "2030-01-01T00:00:00Z"
        }"#;
        let p: Promotion = serde_json::from_str(json).unwrap();
        assert!(p.is_auto());
        assert!(p.is_active);
        assert_eq!(p.discount_type, DiscountType::FixedAmount);
        assert_eq!(p.min_subtotal().cents(), 4000);
        assert_eq!(p.label(), "Free Beans Friday");
    }

    #[test]
    fn test_interval_parsing() {
        assert_eq!(
            "Monthly".parse::<SubscriptionInterval>().unwrap(),
            SubscriptionInterval::Monthly
        );
        assert!("yearly".parse::<SubscriptionInterval>().is_err());
        assert_eq!(SubscriptionInterval::Biweekly.to_string(), "biweekly");
    }
}
