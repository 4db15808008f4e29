//! Shopify Storefront GraphQL client.
//!
//! Supplies the catalog data behind the product grid and the quick-view
//! detail route. Connection-shaped responses (`nodes`) are flattened into
//! [`quickview_core`] types before they leave this crate.

pub mod client;
pub mod error;
pub mod normalize;
pub mod queries;
mod rate_limit;
pub mod types;

pub use client::StorefrontClient;
pub use error::StorefrontError;
pub use normalize::{normalize_card, normalize_product};
