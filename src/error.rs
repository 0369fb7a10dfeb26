use std::path::PathBuf;
use std::time::Duration;

use thirtyfour::error::WebDriverError;
use thiserror::Error;

/// Everything that can stop a listing or a product scrape.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser session failed: {0}")]
    WebDriver(#[from] WebDriverError),

    #[error("`{selector}` did not appear within {timeout:?}: {source}")]
    ElementTimeout {
        selector: String,
        timeout: Duration,
        #[source]
        source: WebDriverError,
    },

    #[error("page at {url} returned an empty document")]
    EmptyPage { url: String },

    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not serialise {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, ScrapeError>;
