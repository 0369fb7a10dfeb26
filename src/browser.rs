//! WebDriver-backed page loading. Every call runs in its own browser session.

use std::time::Duration;

use log::{debug, info, warn};
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use thirtyfour::prelude::*;
use thirtyfour::{CapabilitiesHelper, PageLoadStrategy};
use url::Url;

use crate::catalog::{REFERENCE_DROPDOWN, REFERENCE_TAB};
use crate::config::ScraperConfig;
use crate::error::{Result, ScrapeError};
use crate::spider::PageSource;

const POLL_INTERVAL: Duration = Duration::from_millis(250);

static BODY: Lazy<Selector> = Lazy::new(|| Selector::parse("body").expect("static selector"));
static BODY_CONTENT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("body *").expect("static selector"));

/// A served page has at least one element or some text inside `<body>`.
/// Firefox serialises a blank or aborted load as a bare html/head/body shell.
pub fn has_body_content(html: &str) -> bool {
    let document = Html::parse_document(html);
    if document.select(&BODY_CONTENT).next().is_some() {
        return true;
    }
    document
        .select(&BODY)
        .flat_map(|body| body.text())
        .any(|text| !text.trim().is_empty())
}

/// One Firefox session. Must be finished with [`BrowserSession::close`].
pub struct BrowserSession {
    driver: WebDriver,
}

impl BrowserSession {
    pub async fn open(config: &ScraperConfig, strategy: PageLoadStrategy) -> Result<Self> {
        let mut caps = DesiredCapabilities::firefox();
        if config.headless {
            caps.set_headless()?;
        }
        caps.set_page_load_strategy(strategy)?;

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps).await?;
        Ok(Self { driver })
    }

    pub fn driver(&self) -> &WebDriver {
        &self.driver
    }

    /// Quit the browser. A failure here is logged, not returned, so it never masks the page result.
    pub async fn close(self) {
        match self.driver.quit().await {
            Ok(()) => info!("Browser closed."),
            Err(e) => warn!("Browser did not shut down cleanly: {e}"),
        }
    }
}

/// The live catalog, loaded through a WebDriver server.
pub struct WebDriverCatalog {
    config: ScraperConfig,
}

impl WebDriverCatalog {
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    async fn open_reference_tab(&self, driver: &WebDriver) -> Result<String> {
        info!("Navigating to the catalog page...");
        driver.goto(self.config.catalog_url.as_str()).await?;

        info!("Clicking the 'Reference' tab...");
        driver.find(By::Css(REFERENCE_TAB)).await?.click().await?;

        let timeout = self.config.dropdown_timeout;
        driver
            .query(By::Css(REFERENCE_DROPDOWN))
            .wait(timeout, POLL_INTERVAL)
            .first()
            .await
            .map_err(|source| ScrapeError::ElementTimeout {
                selector: REFERENCE_DROPDOWN.to_string(),
                timeout,
                source,
            })?;

        Ok(driver.source().await?)
    }

    async fn load_product(&self, driver: &WebDriver, url: &Url) -> Result<String> {
        info!("Navigating to: {url}");
        driver.goto(url.as_str()).await?;

        let html = driver.source().await?;
        if !has_body_content(&html) {
            return Err(ScrapeError::EmptyPage { url: url.to_string() });
        }
        debug!("Loaded {} bytes from {url}", html.len());
        Ok(html)
    }
}

impl PageSource for WebDriverCatalog {
    async fn reference_listing(&self) -> Result<String> {
        // Full `load` event: the dropdown is filled by scripts on the landing page.
        let session = BrowserSession::open(&self.config, PageLoadStrategy::Normal).await?;
        let outcome = self.open_reference_tab(session.driver()).await;
        session.close().await;
        outcome
    }

    async fn product_page(&self, url: &Url) -> Result<String> {
        // Detail pages are server-rendered, DOMContentLoaded is enough.
        let session = BrowserSession::open(&self.config, PageLoadStrategy::Eager).await?;
        let outcome = self.load_product(session.driver(), url).await;
        session.close().await;
        outcome
    }
}
