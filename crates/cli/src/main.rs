//! QuickCart CLI - Inspect and edit the cart and wishlist slots.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! qc cart show
//!
//! # Add two units of product p1 at $9.99
//! qc cart add p1 --price 9.99 --quantity 2
//!
//! # Set a quantity (0 or less removes the line)
//! qc cart update p1 5
//!
//! # Toggle a product on the wishlist
//! qc wishlist toggle p1
//! ```
//!
//! # Commands
//!
//! - `cart` - show, add, update, remove, clear, count, total
//! - `wishlist` - list, add, remove, toggle
//!
//! Storage location and slot keys come from the environment; see
//! `quickcart_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use clap::{Parser, Subcommand};
use quickcart_core::ProductId;
use quickcart_storefront::Storefront;
use quickcart_storefront::config::StorefrontConfig;
use quickcart_storefront::notify::TracingNotifier;
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "quickcart_storefront=info,quickcart_cli=info";

#[derive(Parser)]
#[command(name = "qc")]
#[command(author, version, about = "QuickCart cart and wishlist tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart snapshot
    Show,
    /// Add units of a product
    Add {
        /// Product id
        product_id: ProductId,

        /// Unit price captured for a new line
        #[arg(short, long)]
        price: Decimal,

        /// Units to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },
    /// Set a line's quantity (0 or less removes it)
    Update {
        /// Product id
        product_id: ProductId,

        /// New quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove a product's line
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Delete the cart
    Clear,
    /// Print the number of units in the cart
    Count,
    /// Print the cart total
    Total,
}

#[derive(Subcommand)]
enum WishlistAction {
    /// Print the wishlist
    List,
    /// Add a product
    Add {
        /// Product id
        product_id: ProductId,
    },
    /// Remove a product
    Remove {
        /// Product id
        product_id: ProductId,
    },
    /// Add the product if absent, remove it if present
    Toggle {
        /// Product id
        product_id: ProductId,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::debug!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO | tracing::Level::DEBUG => {
            sentry_tracing::EventFilter::Breadcrumb
        }
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so command output on stdout stays machine-readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let sentry_guard = init_sentry(&config);

    if let Err(e) = run(cli, config).await {
        tracing::error!("Command failed: {e}");
        // Flush pending Sentry events before exiting
        drop(sentry_guard);
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: StorefrontConfig) -> Result<(), commands::CommandError> {
    let storefront = Storefront::open(config, Arc::new(TracingNotifier)).await;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(&storefront).await?,
            CartAction::Add {
                product_id,
                price,
                quantity,
            } => commands::cart::add(&storefront, product_id, quantity, price).await?,
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(&storefront, product_id, quantity).await?,
            CartAction::Remove { product_id } => {
                commands::cart::remove(&storefront, product_id).await?;
            }
            CartAction::Clear => commands::cart::clear(&storefront).await?,
            CartAction::Count => commands::cart::count(&storefront).await?,
            CartAction::Total => commands::cart::total(&storefront).await?,
        },
        Commands::Wishlist { action } => match action {
            WishlistAction::List => commands::wishlist::list(&storefront).await?,
            WishlistAction::Add { product_id } => {
                commands::wishlist::add(&storefront, product_id).await?;
            }
            WishlistAction::Remove { product_id } => {
                commands::wishlist::remove(&storefront, product_id).await?;
            }
            WishlistAction::Toggle { product_id } => {
                commands::wishlist::toggle(&storefront, product_id).await?;
            }
        },
    }
    Ok(())
}
