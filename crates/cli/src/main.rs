//! Storefront CLI - drive the cart and catalog from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! storefront catalog list --page 1
//! storefront catalog search "soap"
//! storefront catalog show prod-42
//!
//! # Work with the cart
//! storefront cart add prod-42
//! storefront cart set prod-42 3
//! storefront cart show
//! storefront cart clear
//! ```
//!
//! The cart is kept under `STOREFRONT_STATE_DIR` between runs; the catalog is
//! read from `CATALOG_API_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use storefront_state::{
    CartStore, CatalogStore, ConfigError, FileStorage, ProductApiClient, StateConfig,
};
use storefront_state_core::{PageParams, PriceRangeError, SearchParams, SortDirection};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about = "Storefront cart and catalog tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and change the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the cart contents and totals
    Show,
    /// Look up a product and add one unit of it
    Add {
        /// Product id
        id: String,
    },
    /// Remove a line entirely
    Remove {
        /// Product id
        id: String,
    },
    /// Set a line's quantity (clamped to stock; 0 or less removes it)
    Set {
        /// Product id
        id: String,
        /// Requested quantity
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Add one unit to a line
    Inc {
        /// Product id
        id: String,
    },
    /// Take one unit off a line
    Dec {
        /// Product id
        id: String,
    },
    /// Empty the cart
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products, one page at a time
    List {
        #[command(flatten)]
        paging: Paging,
    },
    /// Search products by name
    Search {
        /// Text to match against product names
        name: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// List products in a category
    Category {
        /// Category name
        name: String,
        #[command(flatten)]
        paging: Paging,
    },
    /// List products priced between `min` and `max`
    Price {
        /// Lowest price, inclusive
        min: Decimal,
        /// Highest price, inclusive
        max: Decimal,
        #[command(flatten)]
        paging: Paging,
    },
    /// Show one product
    Show {
        /// Product id
        id: String,
    },
    /// List featured products
    Featured,
    /// List product categories
    Categories,
    /// List product brands
    Brands,
}

/// Paging options shared by the listing commands.
#[derive(Args)]
struct Paging {
    /// Zero-based page index
    #[arg(short, long, default_value_t = 0)]
    page: u32,

    /// Products per page (defaults to `CATALOG_PAGE_SIZE`)
    #[arg(short, long)]
    size: Option<u32>,

    /// Field to sort by
    #[arg(long, default_value = "createdAt")]
    sort_by: String,

    /// Sort direction (`asc` or `desc`)
    #[arg(long, default_value_t = SortDirection::Desc)]
    sort_dir: SortDirection,
}

impl Paging {
    fn params(&self, default_size: u32) -> PageParams {
        PageParams::page(self.page)
            .with_size(self.size.unwrap_or(default_size))
            .sorted_by(self.sort_by.clone(), self.sort_dir)
    }
}

/// Errors surfaced to the terminal.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A catalog request ended in the error state.
    #[error("{0}")]
    Catalog(String),

    /// Bad price bounds.
    #[error("Invalid price range: {0}")]
    PriceRange(#[from] PriceRangeError),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StateConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
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
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Logs go to stderr so command output stays pipeable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "storefront_state=warn,storefront_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = StateConfig::from_env();

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);
    init_tracing();

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e.into()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: StateConfig) -> Result<(), CliError> {
    let storage = FileStorage::new(&config.state_dir);
    let mut cart = CartStore::load(storage, config.cart_storage_key.as_str());
    let catalog = CatalogStore::new(ProductApiClient::new(&config.catalog_api));
    let page_size = config.page_size;

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(cart.state()),
            CartAction::Add { id } => commands::cart::add(&mut cart, &catalog, id).await?,
            CartAction::Remove { id } => commands::cart::show(cart.remove_item(id)),
            CartAction::Set { id, quantity } => {
                commands::cart::show(cart.set_quantity(id, quantity));
            }
            CartAction::Inc { id } => commands::cart::show(cart.increment_quantity(id)),
            CartAction::Dec { id } => commands::cart::show(cart.decrement_quantity(id)),
            CartAction::Clear => commands::cart::show(cart.clear()),
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { paging } => {
                commands::catalog::list(&catalog, paging.params(page_size)).await?;
            }
            CatalogAction::Search { name, paging } => {
                let params = SearchParams {
                    name,
                    page: Some(paging.page),
                    size: Some(paging.size.unwrap_or(page_size)),
                };
                commands::catalog::search(&catalog, params).await?;
            }
            CatalogAction::Category { name, paging } => {
                commands::catalog::category(&catalog, name, paging.params(page_size)).await?;
            }
            CatalogAction::Price { min, max, paging } => {
                commands::catalog::price(&catalog, min, max, paging.params(page_size)).await?;
            }
            CatalogAction::Show { id } => commands::catalog::show(&catalog, id).await?,
            CatalogAction::Featured => commands::catalog::featured(&catalog).await,
            CatalogAction::Categories => commands::catalog::categories(&catalog).await,
            CatalogAction::Brands => commands::catalog::brands(&catalog).await,
        },
    }
    Ok(())
}
