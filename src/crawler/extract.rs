//! HTML link extraction
//!
//! Pulls raw href strings out of a fetched page. Resolution and validation
//! happen later, against the URL the page was actually served from.

use scraper::{Html, Selector};

/// Extracts the raw href of every `<a>` tag in the document
///
/// The returned strings are unnormalized: relative paths, fragments, and
/// non-http schemes all come back as written in the page.
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}
