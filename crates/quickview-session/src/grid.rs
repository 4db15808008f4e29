//! Product grid: the listing that opens quick views.

use quickview_core::{Image, Money, ProductCard};

/// One rendered grid entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTile<'a> {
    pub handle: &'a str,
    pub title: &'a str,
    pub price: &'a Money,
    pub image: Option<&'a Image>,
    /// Alt text, falling back to the product title.
    pub image_alt: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct ProductGrid {
    cards: Vec<ProductCard>,
}

impl ProductGrid {
    #[must_use]
    pub fn new(cards: Vec<ProductCard>) -> Self {
        Self { cards }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn tiles(&self) -> impl Iterator<Item = GridTile<'_>> {
        self.cards.iter().map(|card| GridTile {
            handle: &card.handle,
            title: &card.title,
            price: &card.price_range.min_variant_price,
            image: card.featured_image.as_ref(),
            image_alt: card
                .featured_image
                .as_ref()
                .and_then(|img| img.alt_text.as_deref())
                .unwrap_or(&card.title),
        })
    }

    /// Handle to open a quick view on, for the tile at `index` (zero-based).
    #[must_use]
    pub fn quick_view_target(&self, index: usize) -> Option<&str> {
        self.cards.get(index).map(|card| card.handle.as_str())
    }

    /// Element id of the quick-view trigger on the tile for `handle`.
    #[must_use]
    pub fn trigger_id(handle: &str) -> String {
        format!("grid-quick-view:{handle}")
    }
}
