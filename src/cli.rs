use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use log::LevelFilter;

use crate::config::{ScraperConfig, WEBDRIVER_URL};

/// Scrape the Purflux catalog into one JSON file per product.
///
/// With no arguments every setting has its production default.
#[derive(Debug, Parser)]
#[command(version)]
pub struct Cli {
    /// WebDriver server (geckodriver) to open browser sessions on.
    #[arg(long, default_value = WEBDRIVER_URL)]
    pub webdriver_url: String,

    /// Show the browser window instead of running headless.
    #[arg(long)]
    pub visible: bool,

    /// Directory that receives the timestamped run directory.
    #[arg(long, default_value = "product")]
    pub output_root: PathBuf,

    /// Pause after each product, in milliseconds.
    #[arg(long, default_value_t = 2000)]
    pub delay_ms: u64,

    /// How long to wait for the reference dropdown, in milliseconds.
    #[arg(long, default_value_t = 5000)]
    pub dropdown_timeout_ms: u64,

    /// Scrape only these references and skip the catalog listing.
    #[arg(long = "reference", value_name = "REF")]
    pub references: Vec<String>,

    /// Log at debug level.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    pub fn config(&self) -> ScraperConfig {
        ScraperConfig {
            webdriver_url: self.webdriver_url.clone(),
            headless: !self.visible,
            output_root: self.output_root.clone(),
            item_delay: Duration::from_millis(self.delay_ms),
            dropdown_timeout: Duration::from_millis(self.dropdown_timeout_ms),
            ..ScraperConfig::default()
        }
    }
}
