use std::path::PathBuf;

use brew_store::StorefrontConfig;
use clap::{Args, Subcommand};

use super::Output;
use crate::error::{CliError, ErrorCode};

#[derive(Debug, Args)]
pub(crate) struct ConfigCommand {
    #[command(subcommand)]
    command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
enum ConfigSubcommand {
    /// Print the effective configuration
    Show,
    /// Write a default storefront.toml
    Init(InitArgs),
}

#[derive(Debug, Args)]
struct InitArgs {
    /// Overwrite an existing file
    #[arg(long)]
    force: bool,
}

pub(crate) fn run(
    command: ConfigCommand,
    config_path: Option<PathBuf>,
    output: Output,
) -> Result<(), CliError> {
    match command.command {
        ConfigSubcommand::Show => {
            let config = StorefrontConfig::load(config_path)?;
            if output.json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("backend:          {}", config.storage.backend);
                println!("data dir:         {}", config.data_dir().display());
                println!("cart key:         {}", config.cart_key());
                println!("promotions:       {}", config.promotions_path().display());
                println!("auto promotions:  {}", config.cart.auto_promotions);
                println!("event capacity:   {}", config.events.broadcast_capacity);
            }
            Ok(())
        }
        ConfigSubcommand::Init(args) => {
            let path = config_path
                .or_else(StorefrontConfig::default_config_path)
                .ok_or_else(|| CliError::new(ErrorCode::ConfigError, "No config path available"))?;

            if path.exists() && !args.force {
                return Err(CliError::new(
                    ErrorCode::ConfigError,
                    format!("{} already exists (use --force to overwrite)", path.display()),
                ));
            }

            let written = StorefrontConfig::default().save(Some(path))?;
            println!("Wrote {}", written.display());
            Ok(())
        }
    }
}
