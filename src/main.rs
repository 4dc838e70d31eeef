use std::path::Path;

use anyhow::Context;
use clap::Parser;

use price_scout::config::MARKET;
use price_scout::{
    CandleChart, CatalogService, Cli, ConsoleNotifier, HistoryFetcher, ItemCatalog, MarketClient,
    SessionRunner, StdinSource, execute_plan,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A. Init Logging
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {:?}", panic_info);
    }));
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // B. Parse Args
    let args = Cli::parse();
    #[cfg(debug_assertions)]
    log::info!("Parsed arguments: {:?}", args);

    // C. Catalog + Services
    let catalog = ItemCatalog::load(Path::new(&args.catalog))
        .await
        .context("catalog file is required before any session can start")?;
    log::info!("Catalog loaded with {} identifiers", catalog.len());

    let base_url = args
        .base_url
        .clone()
        .unwrap_or_else(|| MARKET.base_url.to_string());
    let client = MarketClient::new(base_url)?;
    let catalog_service = CatalogService::connect(client.clone()).await;
    let fetcher = HistoryFetcher::new(client);

    // D. Run one resolution session
    let mut runner = SessionRunner::new(&catalog, &catalog_service, StdinSource::new());
    match runner.resolve_plan(&args.search).await {
        Ok(Some(plan)) => {
            log::info!("Resolved {} ({})", plan.name, plan.variant_id);
            let outcome = execute_plan(
                &plan,
                &fetcher,
                &CandleChart,
                &ConsoleNotifier,
                Path::new(&args.output),
            )
            .await;
            if let Err(e) = outcome {
                // Terminal for the session, reported as plain text, no retry
                log::error!("Pipeline failed for {}: {e}", plan.variant_id);
                println!("{e}");
            }
        }
        Ok(None) => log::info!("Session abandoned before finalizing"),
        Err(e) => println!("{e}"),
    }

    Ok(())
}
