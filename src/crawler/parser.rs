//! Link extractor over fetched markup
//!
//! Given a page body, produces the raw `href` values of its anchor tags.
//! Normalization and classification happen in the `url` module; this
//! layer only walks the document.

use scraper::{Html, Selector};

/// Extracts the raw href values of all `<a href>` tags in a document
///
/// Values are returned untrimmed and unresolved; callers pass each
/// through [`crate::url::normalize_href`] with the page's own URL as the
/// base. `Html::parse_document` is lenient, so malformed markup yields
/// whatever anchors could be recovered rather than an error.
///
/// # Arguments
///
/// * `html` - The page body
///
/// # Returns
///
/// Raw href attribute values, in document order
///
/// # Example
///
/// ```
/// use harvestman::crawler::extract_hrefs;
///
/// let html = r#"<html><body><a href="/a.csv">Data</a></body></html>"#;
/// assert_eq!(extract_hrefs(html), vec!["/a.csv"]);
/// ```
pub fn extract_hrefs(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);

    // The selector literal is valid; parse can only fail on a malformed
    // selector, not on malformed HTML
    let selector = match Selector::parse("a[href]") {
        Ok(s) => s,
        Err(_) => return Vec::new(),
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}
