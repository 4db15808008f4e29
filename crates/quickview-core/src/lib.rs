pub mod app_config;
pub mod catalog;
pub mod config;
pub mod selection;
pub mod variant;

use thiserror::Error;

pub use app_config::{AppConfig, Environment, StorefrontSettings};
pub use catalog::{
    Collection, Image, Money, PriceRange, Product, ProductCard, ProductOption, SelectedOption,
    Variant,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use selection::SelectionMap;
pub use variant::{is_value_available, resolve};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
