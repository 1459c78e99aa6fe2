use std::path::PathBuf;

use brew_store::{
    CartStorage, CartStore, CartStoreOptions, FileStorage, JsonFileCatalog, MemoryStorage,
    StorageBackend, StorefrontConfig,
};
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::error::CliError;

mod config;
mod items;
mod promo;

/// The store every cart command runs against.
pub(crate) type Store = CartStore<Box<dyn CartStorage>, JsonFileCatalog>;

#[derive(Debug, Parser)]
#[command(name = "brew", about = "Brew storefront cart", long_about = None)]
pub(crate) struct Cli {
    /// Path to storefront.toml; platform config dir when omitted
    #[arg(long, global = true, env = "BREW_CONFIG")]
    config: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long, global = true)]
    pub(crate) json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the cart
    Show,
    /// Add a product variant
    Add(items::AddArgs),
    /// Add a bundle
    AddBundle(items::AddBundleArgs),
    /// Add a recurring delivery
    Subscribe(items::SubscribeArgs),
    /// Remove a line item
    Remove(items::RemoveArgs),
    /// Set a line item's quantity
    SetQty(items::SetQtyArgs),
    /// Empty the cart
    Clear,
    /// Promo codes and auto promotions
    Promo(promo::PromoCommand),
    /// Validate the cart and print the checkout summary
    Checkout,
    /// Show or write the configuration
    Config(config::ConfigCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), CliError> {
        let output = Output { json: self.json };

        if let Commands::Config(command) = self.command {
            return config::run(command, self.config, output);
        }

        let store = open_store(self.config)?;

        match self.command {
            Commands::Show => output.cart(&store.cart()),
            Commands::Add(args) => items::add(&store, args, output).await,
            Commands::AddBundle(args) => items::add_bundle(&store, args, output).await,
            Commands::Subscribe(args) => items::subscribe(&store, args, output).await,
            Commands::Remove(args) => items::remove(&store, args, output).await,
            Commands::SetQty(args) => items::set_qty(&store, args, output).await,
            Commands::Clear => output.cart(&store.clear_cart()),
            Commands::Promo(command) => promo::run(&store, command, output).await,
            Commands::Checkout => {
                let summary = store.prepare_checkout()?;
                output.checkout(&summary)
            }
            Commands::Config(_) => Ok(()),
        }
    }
}

/// Builds the store from configuration.
fn open_store(config_path: Option<PathBuf>) -> Result<Store, CliError> {
    let config = StorefrontConfig::load(config_path)?;

    let storage: Box<dyn CartStorage> = match config.storage.backend {
        StorageBackend::File => Box::new(FileStorage::new(config.data_dir())),
        StorageBackend::Memory => Box::new(MemoryStorage::new()),
    };
    let catalog = JsonFileCatalog::new(config.promotions_path());

    debug!(
        backend = %config.storage.backend,
        data_dir = ?config.data_dir(),
        promotions = ?catalog.path(),
        "Opening cart store"
    );

    Ok(CartStore::open(
        storage,
        catalog,
        CartStoreOptions::from(&config),
    ))
}

/// Where command results go.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Output {
    pub(crate) json: bool,
}

impl Output {
    pub(crate) fn cart(&self, cart: &brew_core::Cart) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(cart)?);
        } else {
            print!("{}", crate::render::cart(cart)?);
        }
        Ok(())
    }

    pub(crate) fn checkout(&self, summary: &brew_core::CheckoutSummary) -> Result<(), CliError> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(summary)?);
        } else {
            print!("{}", crate::render::checkout(summary)?);
        }
        Ok(())
    }
}
