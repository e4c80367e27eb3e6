//! CLI command implementations.

pub mod brand_image;
pub mod brands;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod orders;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    List {
        /// Only this brand.
        #[arg(short, long)]
        brand: Option<String>,

        /// Only this olfactive family.
        #[arg(long)]
        family: Option<String>,

        /// Only products with stock.
        #[arg(long)]
        in_stock: bool,

        /// Sort order: name, name_desc, price_asc, price_desc, newest, rating.
        #[arg(short, long, default_value = "name")]
        sort: String,

        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Search products by name, brand or note.
    Search {
        query: String,

        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Show a product and its sizes.
    Show {
        /// Product ID.
        product: String,
    },
    /// List active discovery sets.
    Sets,
    /// Show a discovery set.
    Set {
        /// Discovery set ID.
        set: String,
    },
}

/// Arguments for the brands command.
#[derive(Args)]
pub struct BrandsArgs {
    #[command(subcommand)]
    pub command: BrandsCommand,
}

#[derive(Subcommand)]
pub enum BrandsCommand {
    /// Brands grouped by first letter.
    Index {
        /// Only brands matching this text.
        #[arg(short, long, default_value = "")]
        query: String,

        /// Only this letter (A-Z or #).
        #[arg(short, long)]
        letter: Option<char>,
    },
    /// Brands matching a query, as a flat list.
    Search { query: String },
}

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: CartCommand,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// Price a cart file.
    Quote {
        /// JSON file with cart lines.
        cart: String,
    },
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// JSON file with cart lines.
    pub cart: String,

    /// JSON file with customer details.
    pub form: String,
}

/// Arguments for the orders command.
#[derive(Args)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommand,
}

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders.
    List {
        /// Match ID, name, email or phone.
        #[arg(short, long, default_value = "")]
        search: String,

        #[arg(long)]
        status: Option<String>,

        /// Minimum total, in lei.
        #[arg(long)]
        min_total: Option<f64>,

        /// Maximum total, in lei.
        #[arg(long)]
        max_total: Option<f64>,

        /// Placed on or after this date (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,

        /// Placed before this date (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,

        /// Sort order: newest, total_desc, total_asc, status.
        #[arg(long, default_value = "newest")]
        sort: String,

        #[arg(short, long, default_value = "1")]
        page: i64,
    },
    /// Show an order with its items.
    Show {
        /// Order ID.
        order: String,
    },
    /// Change an order's status.
    Status {
        /// Order ID.
        order: String,
        /// New status.
        status: String,
    },
    /// Change an order's shipping cost.
    Shipping {
        /// Order ID.
        order: String,
        /// Shipping cost in lei.
        lei: f64,
    },
}

/// Arguments for the brand-image command.
#[derive(Args)]
pub struct BrandImageArgs {
    /// Brand name as shown in the catalog.
    pub brand: String,

    /// Image file (png, jpg, webp, svg).
    pub file: String,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Get a config value.
    Get {
        /// Config key (dot-separated).
        key: String,
    },
    /// Set a config value.
    Set {
        /// Config key (dot-separated).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Create parfum.toml in the current directory.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the configuration.
    Validate,
}
