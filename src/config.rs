use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::Result;

pub static CATALOG_URL: &str =
    "http://www.purfluxgroupcatalog.com/catalogues/FO/scripts/accueil.php?zone=FR&catalogue=PFX&lang=GB";
pub static DETAIL_URL: &str =
    "https://www.purfluxgroupcatalog.com/catalogues/FO/scripts/cat_fich_filtre.php?zone=FR&catalogue=PFX&lang=GB";
pub static SITE_ORIGIN: &str = "https://www.purfluxgroupcatalog.com/";
pub static WEBDRIVER_URL: &str = "http://localhost:4444";

/// All knobs of a run. `Default` is the fixed production setup.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub catalog_url: String,
    pub detail_url: String,
    pub site_origin: String,
    pub webdriver_url: String,
    pub headless: bool,
    pub output_root: PathBuf,
    /// Pause after every product, successful or not.
    pub item_delay: Duration,
    /// Upper bound on waiting for the reference dropdown.
    pub dropdown_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            catalog_url: CATALOG_URL.to_string(),
            detail_url: DETAIL_URL.to_string(),
            site_origin: SITE_ORIGIN.to_string(),
            webdriver_url: WEBDRIVER_URL.to_string(),
            headless: true,
            output_root: PathBuf::from("product"),
            item_delay: Duration::from_secs(2),
            dropdown_timeout: Duration::from_secs(5),
        }
    }
}

impl ScraperConfig {
    /// Detail page for one reference: the base query plus `searchref` and an empty `old_marque`.
    pub fn product_url(&self, reference: &str) -> Result<Url> {
        let mut url = Url::parse(&self.detail_url)?;
        url.query_pairs_mut()
            .append_pair("searchref", reference)
            .append_pair("old_marque", "");
        Ok(url)
    }
}
