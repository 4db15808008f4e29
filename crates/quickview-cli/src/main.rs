mod grid;
mod repl;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use quickview_session::HttpProductLoader;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "quickview")]
#[command(about = "Browse a storefront collection and drive a quick view from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List the product grid of a collection
    Grid {
        /// Collection handle (defaults to QUICKVIEW_COLLECTION_HANDLE)
        #[arg(long)]
        collection: Option<String>,
    },
    /// Open an interactive quick view on a product
    QuickView {
        /// Product handle, or a 1-based grid position with --collection
        target: String,
        /// Resolve `target` as a position in this collection's grid
        #[arg(long)]
        collection: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = quickview_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let loader = Arc::new(HttpProductLoader::new(
        &config.api_base_url,
        config.request_timeout_secs,
        &config.user_agent,
    )?);

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Grid { collection }) => {
            let collection = collection.unwrap_or_else(|| config.collection_handle.clone());
            grid::run_grid(&loader, &collection).await?;
        }
        Some(Commands::QuickView { target, collection }) => {
            let handle = match collection {
                Some(collection) => grid::resolve_position(&loader, &collection, &target).await?,
                None => target,
            };
            repl::run_quick_view(&config, loader, &handle).await?;
        }
        None => {
            grid::run_grid(&loader, &config.collection_handle).await?;
        }
    }

    Ok(())
}
