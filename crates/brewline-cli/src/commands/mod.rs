//! Command handlers for the CLI.
//!
//! Handlers are called from `main` once the stores are built. They print
//! plain-text tables to stdout; logs go to stderr.

pub(crate) mod account;
pub(crate) mod cart;
pub(crate) mod catalog;
pub(crate) mod orders;
pub(crate) mod recommend;
pub(crate) mod stores;

use brewline_state::Sourced;
use clap::{Subcommand, ValueEnum};

/// Sub-commands available under `cart`.
#[derive(Debug, Subcommand)]
pub enum CartCommands {
    /// Add a product to the cart
    Add {
        product_id: i64,
        #[arg(long, default_value = "1")]
        quantity: u32,
        /// Cup size (e.g., medium)
        #[arg(long)]
        size: Option<String>,
        /// Serving temperature (e.g., hot, iced)
        #[arg(long)]
        temperature: Option<String>,
        /// Addon product ids, in order
        #[arg(long, value_delimiter = ',')]
        addons: Option<Vec<i64>>,
    },
    /// Show cart lines with their positions
    List,
    /// Set the quantity of the line at `index`
    Update { index: usize, quantity: i64 },
    /// Remove the line at `index`
    Remove { index: usize },
    /// Empty the cart
    Clear,
}

/// Sub-commands available under `stores`.
#[derive(Debug, Subcommand)]
pub enum StoresCommands {
    /// Shops near a point, nearest first
    Nearby {
        #[arg(long, requires = "longitude")]
        latitude: Option<f64>,
        #[arg(long, requires = "latitude")]
        longitude: Option<f64>,
        /// Search radius in metres
        #[arg(long)]
        radius: Option<u64>,
    },
    /// Search shops by name or address
    Search { keyword: String },
    /// Mark or unmark a shop as favorite; lists favorites without an id
    Favorite {
        id: Option<i64>,
        #[arg(long)]
        remove: bool,
    },
    /// Choose the shop used for checkout
    Select { id: i64 },
}

/// Sub-commands available under `orders`.
#[derive(Debug, Subcommand)]
pub enum OrdersCommands {
    /// List past orders
    List {
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
        #[arg(long, default_value = "20")]
        size: u32,
    },
    /// Order everything in the cart
    Checkout {
        /// Shop to order from; defaults to the selected shop
        #[arg(long)]
        store: Option<i64>,
        #[arg(long, default_value = "1")]
        payment_method: i32,
        /// Pickup time (e.g., 2024-05-01T09:30:00); defaults to 15 minutes from now
        #[arg(long)]
        pickup: Option<String>,
        #[arg(long)]
        remarks: Option<String>,
    },
    /// Cancel an order
    Cancel { id: i64 },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StatusArg {
    Pending,
    Processing,
    Completed,
    Cancelled,
    Refunding,
}

impl From<StatusArg> for brewline_core::OrderStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => Self::Pending,
            StatusArg::Processing => Self::Processing,
            StatusArg::Completed => Self::Completed,
            StatusArg::Cancelled => Self::Cancelled,
            StatusArg::Refunding => Self::Refunding,
        }
    }
}

/// Warns on stderr when a listing came from built-in data.
fn note_source<T>(sourced: &Sourced<T>) {
    if sourced.is_fallback() {
        eprintln!("note: the server is unreachable; showing built-in data");
    }
}

/// Truncates to `max` characters, appending `...` when cut.
fn clip(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        format!("{}...", text.chars().take(max).collect::<String>())
    } else {
        text.to_string()
    }
}
