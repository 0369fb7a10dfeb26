use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use log::{error, info};
use purflux_spider::browser::WebDriverCatalog;
use purflux_spider::cli::Cli;
use purflux_spider::output::RunDirectory;
use purflux_spider::Spider;

async fn scrape(cli: &Cli) -> Result<()> {
    let config = cli.config();
    let output = RunDirectory::create(&config.output_root, Utc::now())
        .context("Could not create the output directory")?;

    let spider = Spider::new(WebDriverCatalog::new(config.clone()), output, config);

    if cli.references.is_empty() {
        spider.run().await;
    } else {
        info!("Scraping {} requested product(s) only.", cli.references.len());
        let summary = spider.scrape_products(&cli.references).await;
        info!(
            "Done: {} saved, {} failed.",
            summary.saved, summary.failed
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    purflux_spider::logger::init(cli.log_level());

    info!("Starting Purflux scraper...");
    if let Err(e) = scrape(&cli).await {
        error!("Error in scraping process: {e:#}");
    }
}
