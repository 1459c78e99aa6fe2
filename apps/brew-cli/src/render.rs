//! Plain-text rendering of carts and checkout summaries.

use std::fmt::{self, Write};

use brew_core::{Cart, CheckoutSummary, ItemType, LineItem, SubscriptionInterval};

/// Renders the cart drawer.
///
/// ```text
/// Cart 5b1f...  (2 lines, 3 items)
///   p:ethiopia-yirgacheffe:12oz:wholebean
///     Ethiopia Yirgacheffe · 12oz · Whole Bean      2 × $18.95    $37.90
/// ──────────────────────────────────────────────────────────────────────
///   Subtotal                                                      $37.90
///   Discount (SPRING10)                                           -$3.79
///   Total                                                         $34.11
/// ```
pub fn cart(cart: &Cart) -> Result<String, fmt::Error> {
    let mut out = String::new();

    if cart.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(out);
    }

    writeln!(
        out,
        "Cart {}  ({} lines, {} items)",
        cart.id,
        cart.item_count(),
        cart.total_quantity()
    )?;

    for item in &cart.items {
        writeln!(out, "  {}", item.id)?;
        writeln!(
            out,
            "    {:<44} {:>3} × {:<9} {:>10}",
            describe(item),
            item.quantity,
            item.price_per_unit.to_string(),
            item.line_total.to_string()
        )?;
    }

    writeln!(out, "{}", "─".repeat(74))?;
    writeln!(out, "  {:<60}{:>12}", "Subtotal", cart.subtotal.to_string())?;
    if let Some(promotion) = &cart.applied_promotion {
        let label = format!("Discount ({})", promotion.label());
        writeln!(out, "  {:<60}{:>12}", label, format!("-{}", cart.discount))?;
    }
    writeln!(out, "  {:<60}{:>12}", "Total", cart.total.to_string())?;

    Ok(out)
}

/// Renders the checkout summary.
pub fn checkout(summary: &CheckoutSummary) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(out, "Ready for checkout: cart {}", summary.cart_id)?;
    writeln!(
        out,
        "  {} lines, {} items",
        summary.line_count, summary.total_quantity
    )?;
    writeln!(out, "  Subtotal  {}", summary.subtotal)?;
    if let Some(name) = &summary.promotion_name {
        match &summary.promotion_code {
            Some(code) => writeln!(out, "  Discount  -{} ({}, {})", summary.discount, name, code)?,
            None => writeln!(out, "  Discount  -{} ({})", summary.discount, name)?,
        }
    }
    writeln!(out, "  Total     {}", summary.total)?;
    if summary.has_subscription {
        writeln!(out, "  Includes a subscription: sign in to complete payment")?;
    }

    Ok(out)
}

fn describe(item: &LineItem) -> String {
    let mut parts = vec![item.product_name.clone()];
    if !item.size.is_empty() {
        parts.push(item.size.clone());
    }
    if !item.grind.is_empty() {
        parts.push(item.grind.clone());
    }
    match (item.item_type, &item.subscription) {
        (ItemType::Subscription, Some(details)) => {
            parts.push(format!("every {}", cadence(details.interval)))
        }
        (ItemType::Bundle, _) => parts.push("bundle".to_string()),
        _ => {}
    }
    parts.join(" · ")
}

fn cadence(interval: SubscriptionInterval) -> &'static str {
    match interval {
        SubscriptionInterval::Weekly => "week",
        SubscriptionInterval::Biweekly => "two weeks",
        SubscriptionInterval::Monthly => "month",
    }
}
