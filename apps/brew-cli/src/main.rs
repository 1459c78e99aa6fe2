//! Brew Cart CLI
//!
//! ```text
//! $ brew add --product-id ethiopia-yirgacheffe --name "Ethiopia Yirgacheffe" \
//!       --size 12oz --grind "Whole Bean" --price-cents 1895
//! $ brew promo apply SPRING10
//! $ brew checkout
//! ```

use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod error;
mod render;

use cli::Cli;

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let json = cli.json;

    if let Err(error) = cli.run().await {
        if json {
            match serde_json::to_string(&error) {
                Ok(payload) => eprintln!("{payload}"),
                Err(_) => eprintln!("error[{}]: {}", error.code, error.message),
            }
        } else {
            eprintln!("error[{}]: {}", error.code, error.message);
        }
        process::exit(1);
    }
}

/// Initializes the tracing subscriber.
///
/// Logs go to stderr so stdout stays clean for cart output.
/// Override with `RUST_LOG`, e.g. `RUST_LOG=brew_store=trace`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,brew=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
