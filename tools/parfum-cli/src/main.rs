//! Parfum CLI - storefront and back-office tool for the Parfum shop.
//!
//! Commands:
//! - `parfum catalog` - Browse products and discovery sets
//! - `parfum brands` - Alphabetical brand index
//! - `parfum cart quote` - Price a cart file
//! - `parfum checkout` - Place an order from a cart file
//! - `parfum orders` - Manage orders (admin)
//! - `parfum brand-image` - Upload brand artwork (admin)
//! - `parfum config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use parfum_observability::{init_logging, LogLevel};

use commands::{
    BrandImageArgs, BrandsArgs, CartArgs, CatalogArgs, CheckoutArgs, ConfigArgs, OrdersArgs,
};

/// Parfum CLI - browse the catalog, place orders and manage the shop
#[derive(Parser)]
#[command(name = "parfum")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Use a JSON fixture file instead of the hosted backend
    #[arg(long, global = true)]
    fixture: Option<String>,

    /// Answer yes to confirmation prompts
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse products and discovery sets
    Catalog(CatalogArgs),

    /// Brand index
    Brands(BrandsArgs),

    /// Cart tools
    Cart(CartArgs),

    /// Place an order
    Checkout(CheckoutArgs),

    /// Manage orders (admin)
    Orders(OrdersArgs),

    /// Upload brand artwork (admin)
    BrandImage(BrandImageArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let output = output::Output::new(cli.verbose, cli.json);
    let ctx = context::Context::load(
        cli.config.as_deref(),
        cli.fixture.as_deref(),
        cli.yes,
        output,
    )?;

    let mut log_config = ctx.config.logging.clone();
    if cli.verbose {
        log_config.level = log_config.level.min(LogLevel::Debug);
    }
    init_logging(&log_config).context("Failed to initialize logging")?;

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Brands(args) => commands::brands::run(args, &ctx).await,
        Commands::Cart(args) => commands::cart::run(args, &ctx).await,
        Commands::Checkout(args) => commands::cart::checkout(args, &ctx).await,
        Commands::Orders(args) => commands::orders::run(args, &ctx).await,
        Commands::BrandImage(args) => commands::brand_image::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
