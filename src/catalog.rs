//! Reference codes from the catalog's "Reference" dropdown.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

/// Tab that reveals the reference dropdown.
pub static REFERENCE_TAB: &str = r##"a[data-toggle="tab"][href="#menu4"]"##;
pub static REFERENCE_DROPDOWN: &str = "#ref_filtre";
/// Default option shown before anything is picked.
pub static PLACEHOLDER: &str = "Enter or select";

static OPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("#ref_filtre option").expect("static selector"));

/// Raw option values in document order, as a browser would report `option.value`.
pub fn option_values(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(&OPTION_SELECTOR)
        .map(|option| match option.value().attr("value") {
            Some(value) => value.to_string(),
            None => option
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        })
        .collect()
}

/// Drop blank values and the placeholder.
pub fn filter_references<I, S>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    values
        .into_iter()
        .map(Into::<String>::into)
        .filter(|value| !value.is_empty() && value != PLACEHOLDER)
        .collect()
}

pub fn parse_references(html: &str) -> Vec<String> {
    filter_references(option_values(html))
}
