mod commands;

use std::sync::Arc;

use brewline_state::{AppStores, NoGeolocator};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CartCommands, OrdersCommands, StoresCommands};

#[derive(Debug, Parser)]
#[command(name = "brewline")]
#[command(about = "Brewline storefront command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in with phone number and password
    Login {
        phone: String,
        #[arg(long, env = "BREWLINE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Inspect and edit the shopping cart
    Cart {
        #[command(subcommand)]
        command: CartCommands,
    },
    /// List products
    Products {
        /// Only list products in this category
        #[arg(long)]
        category: Option<i64>,
    },
    /// List product categories
    Categories,
    /// Find and choose a shop
    Stores {
        #[command(subcommand)]
        command: StoresCommands,
    },
    /// Order history and checkout
    Orders {
        #[command(subcommand)]
        command: OrdersCommands,
    },
    /// Show recommendations, promotions and bundles
    Recommend {
        #[arg(long, default_value = "5")]
        limit: u32,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = brewline_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, api = %config.api_base_url, "configuration loaded");

    let app = AppStores::from_config(&config, Arc::new(NoGeolocator))?;

    match cli.command {
        Commands::Login { phone, password } => {
            commands::account::run_login(&app, &phone, &password).await?;
        }
        Commands::Logout => commands::account::run_logout(&app).await,
        Commands::Whoami => commands::account::run_whoami(&app).await?,
        Commands::Cart { command } => commands::cart::run(&app, command).await?,
        Commands::Products { category } => commands::catalog::run_products(&app, category).await?,
        Commands::Categories => commands::catalog::run_categories(&app).await?,
        Commands::Stores { command } => commands::stores::run(&app, command).await?,
        Commands::Orders { command } => commands::orders::run(&app, command).await?,
        Commands::Recommend { limit } => commands::recommend::run(&app, limit).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn cart_add_parses_addon_list() {
        let cli = Cli::try_parse_from([
            "brewline", "cart", "add", "2", "--quantity", "3", "--size", "large", "--addons", "4,1",
        ])
        .unwrap();
        match cli.command {
            Commands::Cart {
                command:
                    CartCommands::Add {
                        product_id,
                        quantity,
                        size,
                        addons,
                        ..
                    },
            } => {
                assert_eq!(product_id, 2);
                assert_eq!(quantity, 3);
                assert_eq!(size.as_deref(), Some("large"));
                assert_eq!(addons, Some(vec![4, 1]));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn nearby_requires_both_coordinates() {
        let result = Cli::try_parse_from(["brewline", "stores", "nearby", "--latitude", "39.9"]);
        assert!(result.is_err());
    }
}
