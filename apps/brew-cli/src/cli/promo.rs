use brew_core::AutoPromotionOutcome;
use clap::{Args, Subcommand};

use super::{Output, Store};
use crate::error::CliError;

#[derive(Debug, Args)]
pub(crate) struct PromoCommand {
    #[command(subcommand)]
    command: PromoSubcommand,
}

#[derive(Debug, Subcommand)]
enum PromoSubcommand {
    /// Apply a promo code, replacing any applied promotion
    Apply(ApplyArgs),
    /// Remove the applied promotion
    Remove,
    /// Apply the best qualifying auto promotion
    Auto,
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// Promo code, case-insensitive
    code: String,
}

pub(crate) async fn run(store: &Store, command: PromoCommand, output: Output) -> Result<(), CliError> {
    match command.command {
        PromoSubcommand::Apply(args) => {
            let cart = store.apply_promo_code(&args.code).await?;
            output.cart(&cart)
        }
        PromoSubcommand::Remove => output.cart(&store.remove_promotion()),
        PromoSubcommand::Auto => {
            let outcome = store.check_auto_promotions().await?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                return Ok(());
            }

            match &outcome {
                AutoPromotionOutcome::Applied(promotion) => {
                    println!("Applied {}", promotion.label())
                }
                AutoPromotionOutcome::Removed(promotion) => {
                    println!("Removed {} (cart no longer qualifies)", promotion.label())
                }
                AutoPromotionOutcome::KeptManual => println!("Keeping the promo code you entered"),
                AutoPromotionOutcome::Unchanged => println!("No change"),
            }
            output.cart(&store.cart())
        }
    }
}
