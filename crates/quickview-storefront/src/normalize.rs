//! Normalization from Storefront connection shapes to [`quickview_core`] types.

use quickview_core::{PriceRange, Product, ProductCard, Variant};

use crate::types::{StorefrontCard, StorefrontProduct, StorefrontVariant};

/// Flattens a [`StorefrontProduct`] into a [`Product`].
///
/// `images.nodes` becomes `media` and `variants.nodes` becomes `variants`,
/// both in response order. A `null` description becomes an empty string.
#[must_use]
pub fn normalize_product(product: StorefrontProduct) -> Product {
    if product.variants.nodes.is_empty() {
        tracing::debug!(handle = %product.handle, "product has no variants; quick view cannot resolve one");
    }

    Product {
        id: product.id,
        handle: product.handle,
        title: product.title,
        description: product.description.unwrap_or_default(),
        media: product.images.nodes,
        featured_image: product.featured_image,
        options: product.options,
        variants: product
            .variants
            .nodes
            .into_iter()
            .map(normalize_variant)
            .collect(),
    }
}

fn normalize_variant(variant: StorefrontVariant) -> Variant {
    Variant {
        id: variant.id,
        available_for_sale: variant.available_for_sale,
        selected_options: variant.selected_options,
        image: variant.image,
        price: variant.price,
    }
}

#[must_use]
pub fn normalize_card(card: StorefrontCard) -> ProductCard {
    ProductCard {
        id: card.id,
        handle: card.handle,
        title: card.title,
        featured_image: card.featured_image,
        price_range: PriceRange {
            min_variant_price: card.price_range.min_variant_price,
        },
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
