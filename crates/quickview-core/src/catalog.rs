//! Storefront catalog types shared by the server, the storefront client and
//! the quick-view session.
//!
//! All types serialize with camelCase keys; this is the JSON shape served by
//! `GET /api/product/{handle}` and read back by the session's HTTP loader.
//! Prices are never parsed: `Money::amount` is the decimal string exactly as
//! the shop returned it and `currency_code` is passed through verbatim.

use serde::{Deserialize, Serialize};

/// A price as returned by the storefront, e.g. `{"amount": "29.0", "currencyCode": "USD"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    pub amount: String,
    pub currency_code: String,
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

/// One selectable dimension of a product, e.g. `Color` with `["Red", "Blue"]`.
///
/// Value order is display order. Duplicate values are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

/// One concrete, purchasable combination of option values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub available_for_sale: bool,
    pub selected_options: Vec<SelectedOption>,
    #[serde(default)]
    pub image: Option<Image>,
    pub price: Money,
}

impl Variant {
    /// Returns this variant's value for `option_name`, if it carries one.
    #[must_use]
    pub fn option_value(&self, option_name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|o| o.name == option_name)
            .map(|o| o.value.as_str())
    }
}

/// The full detail record behind a quick view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub media: Vec<Image>,
    #[serde(default)]
    pub featured_image: Option<Image>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|o| o.name == name)
    }

    /// Image shown when no variant image applies: featured image, else the
    /// first gallery image.
    #[must_use]
    pub fn fallback_image(&self) -> Option<&Image> {
        self.featured_image.as_ref().or_else(|| self.media.first())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRange {
    pub min_variant_price: Money,
}

/// Lightweight listing entry used to populate the product grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub featured_image: Option<Image>,
    pub price_range: PriceRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub title: String,
    pub handle: String,
}
