pub mod auth_hook;
pub mod client;
pub mod error;
pub mod types;

pub use auth_hook::AuthHook;
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{
    AuthPayload, NearbyQuery, OrderQuery, PaymentReceipt, ProductQuery, RecommendQuery,
    StatusChange, StoreSearchQuery, TokenPair,
};
