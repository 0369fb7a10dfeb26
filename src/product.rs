//! Product record and the detail-page field extraction rules.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

/// Filler for fields the page does not carry.
pub static NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Dimension {
    Height,
    Length,
    Width,
}

impl Dimension {
    /// Checked in this order; the first marker found in a row wins.
    pub const ALL: [Dimension; 3] = [Dimension::Height, Dimension::Length, Dimension::Width];

    pub fn marker(self) -> &'static str {
        match self {
            Dimension::Height => "Height :",
            Dimension::Length => "Length :",
            Dimension::Width => "Width :",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSource {
    #[serde(rename = "imageURL800")]
    pub image_url_800: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "IAM_PN")]
    pub iam_pn: String,
    #[serde(rename = "Product_Line")]
    pub product_line: String,
    #[serde(rename = "Dimensions")]
    pub dimensions: BTreeMap<Dimension, String>,
    #[serde(rename = "Source")]
    pub source: Vec<ImageSource>,
    #[serde(rename = "OE_PN")]
    pub oe_pn: Vec<String>,
    #[serde(rename = "Vehicle_Application")]
    pub vehicle_application: Vec<String>,
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

static H1: Lazy<Selector> = Lazy::new(|| selector("h1"));
static TITLE_SPAN: Lazy<Selector> = Lazy::new(|| selector("h2.title.background4.color1 span"));
static CHARACTERISTIC_ROWS: Lazy<Selector> = Lazy::new(|| selector(".caracteristics .row1.color3"));
static THUMBNAIL_LINK: Lazy<Selector> = Lazy::new(|| selector("figure a.thumbnail.fancybox"));
static CROSS_REFERENCE_ROWS: Lazy<Selector> = Lazy::new(|| {
    selector("div.row.margin20.row2.txtcontent, div.row.margin20.background4.row2.txtcontent")
});
static CROSS_REFERENCE_CELL: Lazy<Selector> = Lazy::new(|| selector("div.col-xs-3.txtcenter"));
static APPLICATION_ROWS: Lazy<Selector> = Lazy::new(|| selector("div.row.margin20.row2.txtcontent"));
static MODEL_CELL: Lazy<Selector> = Lazy::new(|| selector("div.col-xs-2.txtleft strong"));
/// Engine codes, power, production year, engine code detail.
static APPLICATION_CELLS: Lazy<[Selector; 4]> = Lazy::new(|| {
    [2, 3, 4, 5].map(|n| selector(&format!("div.col-xs-2:nth-child({n})")))
});

/// Relative prefix the site uses for product images.
static RELATIVE_IMAGE_PREFIX: &str = "../../";

/// Parse a rendered detail page.
///
/// Image links are resolved against `page_url` the way a browser resolves
/// `a.href`; `site_origin` only stands in for a `../../` prefix the URL
/// parser rejects.
pub fn parse_product(html: &str, page_url: &Url, site_origin: &str) -> ProductRecord {
    let document = Html::parse_document(html);

    // Part number and product line read the title span independently:
    // a missing span leaves the part number empty but the line "N/A".
    let title_span = first_text(&document, &TITLE_SPAN);
    let heading = first_text(&document, &H1)
        .filter(|text| !text.is_empty())
        .or_else(|| title_span.clone())
        .unwrap_or_default();

    ProductRecord {
        iam_pn: strip_whitespace(&heading),
        product_line: title_span.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        dimensions: dimensions(&document),
        source: vec![ImageSource {
            image_url_800: image_url(&document, page_url, site_origin),
        }],
        oe_pn: cross_references(&document),
        vehicle_application: vehicle_applications(&document),
    }
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn first_text(document: &Html, selector: &Selector) -> Option<String> {
    document.select(selector).next().map(text_of)
}

fn first_text_in(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(text_of)
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Value of a characteristic row, keyed by the first marker it contains.
pub fn parse_dimension_row(row_text: &str) -> Option<(Dimension, String)> {
    let text = row_text.trim();
    Dimension::ALL.into_iter().find_map(|dimension| {
        text.contains(dimension.marker()).then(|| {
            let value = text.replacen(dimension.marker(), "", 1);
            (dimension, value.trim().to_string())
        })
    })
}

fn dimensions(document: &Html) -> BTreeMap<Dimension, String> {
    document
        .select(&CHARACTERISTIC_ROWS)
        .filter_map(|row| parse_dimension_row(&row.text().collect::<String>()))
        .collect()
}

/// Absolute form of an image link, or `None` for an empty/unusable one.
pub fn resolve_image_href(href: &str, page_url: &Url, site_origin: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }
    match page_url.join(href) {
        Ok(resolved) => Some(resolved.into()),
        Err(_) => href
            .strip_prefix(RELATIVE_IMAGE_PREFIX)
            .map(|rest| format!("{}/{}", site_origin.trim_end_matches('/'), rest)),
    }
}

fn image_url(document: &Html, page_url: &Url, site_origin: &str) -> String {
    document
        .select(&THUMBNAIL_LINK)
        .next()
        .and_then(|link| link.value().attr("href"))
        .and_then(|href| resolve_image_href(href, page_url, site_origin))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn cross_references(document: &Html) -> Vec<String> {
    document
        .select(&CROSS_REFERENCE_ROWS)
        .filter_map(|row| first_text_in(row, &CROSS_REFERENCE_CELL))
        .filter(|value| !value.is_empty())
        .collect()
}

fn vehicle_applications(document: &Html) -> Vec<String> {
    document
        .select(&APPLICATION_ROWS)
        .filter_map(|row| {
            let model = first_text_in(row, &MODEL_CELL)?;
            let details = APPLICATION_CELLS
                .iter()
                .map(|cell| first_text_in(row, cell).unwrap_or_default());
            Some(std::iter::once(model).chain(details).collect::<String>())
        })
        .filter(|entry| !entry.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SITE_ORIGIN;

    const FULL_PAGE: &str = include_str!("../tests/fixtures/product_a1259.html");
    const BARE_PAGE: &str = include_str!("../tests/fixtures/product_bare.html");

    fn page_url() -> Url {
        Url::parse(
            "https://www.purfluxgroupcatalog.com/catalogues/FO/scripts/cat_fich_filtre.php?zone=FR&catalogue=PFX&lang=GB&searchref=A1259&old_marque=",
        )
        .unwrap()
    }

    fn parse(html: &str) -> ProductRecord {
        parse_product(html, &page_url(), SITE_ORIGIN)
    }

    #[test]
    fn full_page_yields_every_field() {
        let record = parse(FULL_PAGE);

        assert_eq!(record.iam_pn, "A1259");
        assert_eq!(record.product_line, "Air filter");
        assert_eq!(
            record.dimensions,
            BTreeMap::from([
                (Dimension::Height, "58 mm".to_string()),
                (Dimension::Length, "285 mm".to_string()),
                (Dimension::Width, "213 mm".to_string()),
            ])
        );
        assert_eq!(
            record.source,
            vec![ImageSource {
                image_url_800: "https://www.purfluxgroupcatalog.com/catalogues/photos/800/A1259.jpg"
                    .to_string()
            }]
        );
        assert_eq!(record.oe_pn, vec!["1444 TK", "1444 VK", "9805 1570 80"]);
        assert_eq!(
            record.vehicle_application,
            vec![
                "2081.6 HDi68 kW2012-2019DV6DTED",
                "20081.2 PureTech60 kW2013-",
            ]
        );
    }

    #[test]
    fn bare_page_falls_back_to_sentinels() {
        let record = parse(BARE_PAGE);

        assert_eq!(record.iam_pn, "");
        assert_eq!(record.product_line, NOT_AVAILABLE);
        assert!(record.dimensions.is_empty());
        assert_eq!(
            record.source,
            vec![ImageSource { image_url_800: NOT_AVAILABLE.to_string() }]
        );
        assert!(record.oe_pn.is_empty());
        assert!(record.vehicle_application.is_empty());
    }

    #[test]
    fn part_number_falls_back_to_title_span_when_h1_is_empty() {
        let html = r#"<h1>   </h1><h2 class="title background4 color1"><span> L 358 </span></h2>"#;
        let record = parse(html);
        assert_eq!(record.iam_pn, "L358");
        assert_eq!(record.product_line, "L 358");
    }

    #[test]
    fn part_number_strips_inner_whitespace_from_h1() {
        let record = parse("<h1>\n  FCS 710\u{a0}A </h1>");
        assert_eq!(record.iam_pn, "FCS710A");
        assert_eq!(record.product_line, NOT_AVAILABLE);
    }

    #[test]
    fn empty_title_span_is_kept_as_empty_product_line() {
        let html = r#"<h1>A1</h1><h2 class="title background4 color1"><span></span></h2>"#;
        assert_eq!(parse(html).product_line, "");
    }

    #[test]
    fn dimension_rows_use_first_matching_marker() {
        assert_eq!(
            parse_dimension_row("  Height : 58 mm "),
            Some((Dimension::Height, "58 mm".to_string()))
        );
        assert_eq!(
            parse_dimension_row("Length : Width : 3"),
            Some((Dimension::Length, "Width : 3".to_string()))
        );
        assert_eq!(parse_dimension_row("Weight : 2 kg"), None);
        assert_eq!(parse_dimension_row("Height:58"), None);
    }

    #[test]
    fn image_links_resolve_against_the_detail_page() {
        let url = page_url();
        // cat_fich_filtre.php lives in /catalogues/FO/scripts/, two levels below /catalogues/.
        assert_eq!(
            resolve_image_href("../../photos/800/X.jpg", &url, SITE_ORIGIN).as_deref(),
            Some("https://www.purfluxgroupcatalog.com/catalogues/photos/800/X.jpg")
        );
        assert_eq!(
            resolve_image_href("https://www.purfluxgroupcatalog.com/catalogues/photos/800/X.jpg", &url, SITE_ORIGIN)
                .as_deref(),
            Some("https://www.purfluxgroupcatalog.com/catalogues/photos/800/X.jpg")
        );
        assert_eq!(
            resolve_image_href("/photos/800/X.jpg", &url, SITE_ORIGIN).as_deref(),
            Some("https://www.purfluxgroupcatalog.com/photos/800/X.jpg")
        );
        assert_eq!(resolve_image_href("  ", &url, SITE_ORIGIN), None);
    }

    #[test]
    fn thumbnail_without_href_is_not_available() {
        let html = r#"<figure><a class="thumbnail fancybox">zoom</a></figure>"#;
        assert_eq!(parse(html).source[0].image_url_800, NOT_AVAILABLE);
    }

    #[test]
    fn output_lists_never_contain_empty_entries() {
        let record = parse(FULL_PAGE);
        assert!(record.oe_pn.iter().all(|value| !value.is_empty()));
        assert!(record.vehicle_application.iter().all(|value| !value.is_empty()));
    }

    #[test]
    fn record_serialises_with_catalog_field_names() {
        let json = serde_json::to_value(parse(BARE_PAGE)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "IAM_PN": "",
                "Product_Line": "N/A",
                "Dimensions": {},
                "Source": [{ "imageURL800": "N/A" }],
                "OE_PN": [],
                "Vehicle_Application": []
            })
        );
    }
}
