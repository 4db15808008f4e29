use thiserror::Error;

/// Why a product detail load did not produce a product.
///
/// Both variants are non-fatal: the session renders an error panel and stays
/// closable and reopenable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("product not found: {handle}")]
    NotFound { handle: String },

    #[error("failed to load product: {0}")]
    Transport(String),
}

impl LoadError {
    /// Message shown in the overlay's error panel.
    #[must_use]
    pub fn display_message(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "Product not found",
            LoadError::Transport(_) => "Failed to load product",
        }
    }
}
