// Core modules
pub mod analysis;
pub mod catalog;
pub mod chart;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod notify;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use catalog::{CatalogService, ItemCatalog};
pub use chart::{CandleChart, ChartRenderer};
pub use data::{HistoryFetcher, MarketClient};
pub use domain::{Candle, ItemVariant, PriceSample, Rarity};
pub use error::{MarketError, Result};
pub use notify::{ConsoleNotifier, Notifier};
pub use session::{ResolutionSession, SessionRunner, StdinSource, execute_plan};

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// The item name to search for (e.g. Falchion)
    pub search: String,

    /// Path to the catalog identifier list
    #[arg(long, default_value = "item_ids.json")]
    pub catalog: String,

    /// Output path for the rendered chart artifact
    #[arg(long, default_value = "chart.png")]
    pub output: String,

    /// Override the marketplace API base URL
    #[arg(long)]
    pub base_url: Option<String>,
}
