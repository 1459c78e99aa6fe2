use brew_core::{
    BundleComponent, BundleSelection, ProductSelection, SubscriptionInterval,
    SubscriptionSelection,
};
use clap::Args;

use super::{Output, Store};
use crate::error::CliError;

#[derive(Debug, Args)]
pub(crate) struct ProductArgs {
    /// Product slug
    #[arg(long)]
    product_id: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Bag size, e.g. 12oz
    #[arg(long)]
    size: String,

    /// Grind, e.g. "Whole Bean"
    #[arg(long)]
    grind: String,

    /// Unit price in cents
    #[arg(long)]
    price_cents: i64,

    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct AddArgs {
    #[command(flatten)]
    product: ProductArgs,

    #[arg(long, short, default_value_t = 1, allow_negative_numbers = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
pub(crate) struct AddBundleArgs {
    #[arg(long)]
    bundle_id: String,

    #[arg(long)]
    name: String,

    /// Grind applied to every coffee in the bundle
    #[arg(long)]
    grind: String,

    /// Bundle price in cents
    #[arg(long)]
    price_cents: i64,

    /// Contents as NAME:SIZE:QTY, repeatable
    #[arg(long = "component", value_parser = parse_component)]
    components: Vec<BundleComponent>,

    #[arg(long)]
    image_url: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct SubscribeArgs {
    #[command(flatten)]
    product: ProductArgs,

    /// weekly, biweekly or monthly
    #[arg(long)]
    interval: SubscriptionInterval,
}

#[derive(Debug, Args)]
pub(crate) struct RemoveArgs {
    /// Line item id as shown by `brew show`
    id: String,
}

#[derive(Debug, Args)]
pub(crate) struct SetQtyArgs {
    /// Line item id as shown by `brew show`
    id: String,

    #[arg(allow_negative_numbers = true)]
    pub(crate) quantity: i64,
}

impl ProductArgs {
    fn selection(self) -> ProductSelection {
        ProductSelection {
            product_id: self.product_id,
            product_name: self.name,
            size: self.size,
            grind: self.grind,
            price_cents: self.price_cents,
            image_url: self.image_url,
        }
    }
}

pub(crate) async fn add(store: &Store, args: AddArgs, output: Output) -> Result<(), CliError> {
    let selection = args.product.selection();
    let cart = store.add_to_cart(&selection, args.quantity).await?;
    output.cart(&cart)
}

pub(crate) async fn add_bundle(
    store: &Store,
    args: AddBundleArgs,
    output: Output,
) -> Result<(), CliError> {
    let bundle = BundleSelection {
        bundle_id: args.bundle_id,
        name: args.name,
        grind: args.grind,
        price_cents: args.price_cents,
        components: args.components,
        image_url: args.image_url,
    };
    let cart = store.add_bundle_to_cart(&bundle).await?;
    output.cart(&cart)
}

pub(crate) async fn subscribe(
    store: &Store,
    args: SubscribeArgs,
    output: Output,
) -> Result<(), CliError> {
    let product = args.product.selection();
    let selection = SubscriptionSelection {
        product_id: product.product_id,
        product_name: product.product_name,
        size: product.size,
        grind: product.grind,
        price_cents: product.price_cents,
        interval: args.interval,
        image_url: product.image_url,
    };
    let cart = store.add_subscription_to_cart(&selection).await?;
    output.cart(&cart)
}

pub(crate) async fn remove(store: &Store, args: RemoveArgs, output: Output) -> Result<(), CliError> {
    let cart = store.remove_from_cart(&args.id).await?;
    output.cart(&cart)
}

pub(crate) async fn set_qty(store: &Store, args: SetQtyArgs, output: Output) -> Result<(), CliError> {
    let cart = store.update_quantity(&args.id, args.quantity).await?;
    output.cart(&cart)
}

/// Parses `NAME:SIZE:QTY`. Quantity defaults to 1 when omitted.
fn parse_component(raw: &str) -> Result<BundleComponent, String> {
    let mut parts = raw.splitn(3, ':').map(str::trim);

    let product_name = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing product name in '{raw}'"))?;
    let size = parts
        .next()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("missing size in '{raw}'"))?;
    let quantity = match parts.next() {
        Some(qty) => qty
            .parse::<i64>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| format!("invalid quantity in '{raw}'"))?,
        None => 1,
    };

    Ok(BundleComponent {
        product_name: product_name.to_string(),
        size: size.to_string(),
        quantity,
    })
}
