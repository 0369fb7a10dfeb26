//! The run loop: list references once, then scrape each product in turn.

use log::{error, info, warn};
use thirtyfour::support;
use url::Url;

use crate::catalog;
use crate::config::ScraperConfig;
use crate::error::Result;
use crate::output::{self, RunDirectory};
use crate::product::{self, ProductRecord};

/// Where rendered pages come from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// DOM of the catalog page once the reference dropdown is showing.
    async fn reference_listing(&self) -> Result<String>;

    /// DOM of one product detail page.
    async fn product_page(&self, url: &Url) -> Result<String>;
}

/// Counters for the final log line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub listed: usize,
    pub saved: usize,
    pub failed: usize,
}

pub struct Spider<S> {
    source: S,
    output: RunDirectory,
    config: ScraperConfig,
}

impl<S: PageSource> Spider<S> {
    pub fn new(source: S, output: RunDirectory, config: ScraperConfig) -> Self {
        Self {
            source,
            output,
            config,
        }
    }

    pub fn output(&self) -> &RunDirectory {
        &self.output
    }

    /// Reference codes from the catalog, also written to `product_references.json`.
    /// `None` when anything went wrong; the cause is logged.
    pub async fn list_references(&self) -> Option<Vec<String>> {
        match self.try_list_references().await {
            Ok(references) => Some(references),
            Err(e) => {
                error!("Error during scraping: {e}");
                None
            }
        }
    }

    async fn try_list_references(&self) -> Result<Vec<String>> {
        let html = self.source.reference_listing().await?;
        let references = catalog::parse_references(&html);
        info!("Extracted {} product references.", references.len());
        self.output.write_json(output::REFERENCES_FILE, &references)?;
        Ok(references)
    }

    /// Scrape and save one product. `None` on failure; the cause is logged.
    pub async fn extract_product(&self, reference: &str) -> Option<ProductRecord> {
        match self.try_extract_product(reference).await {
            Ok(record) => {
                info!("Scraped data for product: {reference}");
                Some(record)
            }
            Err(e) => {
                error!("Error scraping product {reference}: {e}");
                None
            }
        }
    }

    async fn try_extract_product(&self, reference: &str) -> Result<ProductRecord> {
        let url = self.config.product_url(reference)?;
        let html = self.source.product_page(&url).await?;
        let record = product::parse_product(&html, &url, &self.config.site_origin);
        self.output
            .write_json(&output::product_file_name(reference), &record)?;
        Ok(record)
    }

    /// Scrape the given references in order, pausing after each one.
    pub async fn scrape_products(&self, references: &[String]) -> RunSummary {
        let mut summary = RunSummary {
            listed: references.len(),
            ..RunSummary::default()
        };

        for (index, reference) in references.iter().enumerate() {
            info!(
                "Scraping product {} of {}: {}",
                index + 1,
                references.len(),
                reference
            );
            match self.extract_product(reference).await {
                Some(_) => summary.saved += 1,
                None => summary.failed += 1,
            }

            // The site starts refusing requests when hit back to back.
            support::sleep(self.config.item_delay).await;
        }

        summary
    }

    /// Full run: list the catalog, then every product.
    pub async fn run(&self) -> RunSummary {
        let references = match self.list_references().await {
            Some(references) if !references.is_empty() => references,
            _ => {
                warn!("No products found, stopping scraper.");
                return RunSummary::default();
            }
        };

        let summary = self.scrape_products(&references).await;
        info!(
            "All products scraped: {} saved, {} failed.",
            summary.saved, summary.failed
        );
        summary
    }
}
