pub mod client;
pub mod history;

pub use client::{ApiEnvelope, MarketClient};
pub use history::HistoryFetcher;
