pub mod app_config;
pub mod cart;
pub mod catalog;
pub mod config;
pub mod location;
pub mod orders;
pub mod recommendations;
pub mod user;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use cart::{CartItem, NewCartItem, VariantKey};
pub use catalog::{Category, Product, ProductStatus};
pub use config::{load_app_config, load_app_config_from_env};
pub use location::{Coordinates, Store};
pub use orders::{NewOrder, Order, OrderLine, OrderStatus};
pub use recommendations::{
    ComboProduct, Feedback, ProductCombination, Promotion, RecommendedProduct, Recommendation,
};
pub use user::User;

/// Errors raised while loading [`AppConfig`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

/// Errors raised by domain-level validation.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("unknown order status code: {0}")]
    UnknownOrderStatus(i32),
}
