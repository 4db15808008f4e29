//! `grid` command: lists a collection the way the storefront grid shows it.

use anyhow::Context;
use quickview_session::{GridTile, HttpProductLoader, ProductGrid};

async fn load_grid(loader: &HttpProductLoader, collection: &str) -> anyhow::Result<ProductGrid> {
    let cards = loader
        .fetch_collection(collection)
        .await
        .with_context(|| format!("failed to list collection {collection}"))?;
    tracing::debug!(collection, count = cards.len(), "collection loaded");
    Ok(ProductGrid::new(cards))
}

pub(crate) async fn run_grid(loader: &HttpProductLoader, collection: &str) -> anyhow::Result<()> {
    let grid = load_grid(loader, collection).await?;
    if grid.is_empty() {
        println!("No products in collection '{collection}'.");
        return Ok(());
    }

    for (index, tile) in grid.tiles().enumerate() {
        println!("{}", format_tile(index + 1, &tile));
    }
    println!();
    println!("Open one with: quickview quick-view <handle>");
    Ok(())
}

/// Maps a 1-based grid position in `collection` to its product handle.
/// Anything that is not a number is taken as a handle already.
pub(crate) async fn resolve_position(
    loader: &HttpProductLoader,
    collection: &str,
    target: &str,
) -> anyhow::Result<String> {
    let Ok(position) = target.parse::<usize>() else {
        return Ok(target.to_owned());
    };

    let grid = load_grid(loader, collection).await?;
    position
        .checked_sub(1)
        .and_then(|index| grid.quick_view_target(index))
        .map(str::to_owned)
        .with_context(|| {
            format!(
                "collection {collection} has {} products; no position {position}",
                grid.len()
            )
        })
}

pub(crate) fn format_tile(position: usize, tile: &GridTile<'_>) -> String {
    let image = tile
        .image
        .map_or_else(|| "no image".to_owned(), |img| format!("{} ({})", img.url, tile.image_alt));
    format!(
        "{position:>3}. {}  {}  [{}]  {image}",
        tile.title, tile.price, tile.handle
    )
}
