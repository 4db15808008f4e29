//! Storefront API response types.
//!
//! ## Observed shape
//!
//! ### Envelope
//! Every response is `{ "data": ..., "errors": [...] }`. Either key may be
//! absent. A query that names a missing collection or product still returns
//! HTTP 200 with `data.collection` / `data.product` set to `null`.
//!
//! ### Connections
//! Lists come wrapped as connections: `images { nodes [...] }`,
//! `variants { nodes [...] }`. We only request `nodes`, never `edges`.
//!
//! ### Money
//! `amount` is a decimal **string** (`"29.0"`, not `29.0`) and is passed
//! through untouched together with `currencyCode`.
//!
//! ### `description`
//! Plain text. Observed as `""` for products without copy, but modelled as
//! `Option<String>` because some shops return `null`.

use quickview_core::{Collection, Image, Money, ProductOption, SelectedOption};
use serde::Deserialize;

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    pub errors: Option<Vec<GraphQlError>>,
}

/// A single entry of the top-level `errors` array.
#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    pub collections: Connection<Collection>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionProductsData {
    pub collection: Option<CollectionProducts>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionProducts {
    pub products: Connection<StorefrontCard>,
}

/// Grid entry as returned inside `collection.products.nodes`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontCard {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub price_range: StorefrontPriceRange,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontPriceRange {
    pub min_variant_price: Money,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<StorefrontProduct>,
}

/// Detail record as returned by `product(handle:)`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontProduct {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub images: Connection<Image>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    pub variants: Connection<StorefrontVariant>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontVariant {
    pub id: String,
    pub available_for_sale: bool,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
    pub price: Money,
}
