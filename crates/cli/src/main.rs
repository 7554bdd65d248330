//! Marketplace Cart CLI - drive the cart store from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Add a product (quantity 1, or +1 if already in the cart)
//! cart-cli add --id shirt-1 --title "Shirt" --image-url https://img/shirt.png --price 10
//!
//! # Change quantities
//! cart-cli increment shirt-1
//! cart-cli decrement shirt-1
//!
//! # Show the cart
//! cart-cli list
//! cart-cli total
//! ```
//!
//! # Commands
//!
//! - `list` - Print every line in the cart
//! - `add` - Add one unit of a product
//! - `increment` / `decrement` - Change a line's quantity by one
//! - `total` - Print item count and subtotal
//!
//! The cart is stored under `--storage-dir` (or `CART_STORAGE_DIR`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use marketplace_cart::{CartConfig, CartProvider, FileStore, LogFormat};
use rust_decimal::Decimal;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Marketplace Cart CLI tools")]
struct Cli {
    /// Directory holding the stored cart (overrides `CART_STORAGE_DIR`)
    #[arg(long, global = true)]
    storage_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every line in the cart
    List,
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Product title
        #[arg(long)]
        title: String,

        /// Product image URL
        #[arg(long)]
        image_url: String,

        /// Unit price
        #[arg(long)]
        price: Decimal,
    },
    /// Add one unit of a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit of a product
    Decrement {
        /// Product ID
        id: String,
    },
    /// Print item count and subtotal
    Total,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match CartConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(config.log_format);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing on stderr so stdout only carries command output.
///
/// Defaults to info level for the cart crates if `RUST_LOG` is not set.
fn init_tracing(format: LogFormat) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "marketplace_cart=info,cart_cli=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

async fn run(cli: Cli, config: CartConfig) -> Result<(), Box<dyn std::error::Error>> {
    let store = FileStore::new(cli.storage_dir.unwrap_or(config.storage_dir));
    tracing::debug!(dir = %store.dir().display(), "Using file store");

    let provider = CartProvider::start(store);
    provider.loaded().await;

    provider.sync_scope(|| match cli.command {
        Commands::List => commands::cart::list(),
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => commands::cart::add(&id, &title, &image_url, price),
        Commands::Increment { id } => commands::cart::increment(&id),
        Commands::Decrement { id } => commands::cart::decrement(&id),
        Commands::Total => commands::cart::total(),
    });

    provider.shutdown().await?;
    Ok(())
}
