//! HTML link extraction
//!
//! Finds every `<a href>` in a document and resolves it to an absolute URL.
//! Individual malformed hrefs are dropped; a document never fails as a whole.

use crate::url::resolve_href;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracts anchor targets from an HTML document
///
/// Targets are returned in document order with repeats removed, resolved
/// against `current_url` by [`resolve_href`].
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `current_url` - URL of the page the document was fetched from
///
/// # Example
///
/// ```
/// use sitemap_crawler::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/a">A</a><a href="b">B</a><a href="/a">A again</a>"#;
/// let page = Url::parse("https://example.com/dir/page").unwrap();
/// assert_eq!(
///     extract_links(html, &page),
///     vec!["https://example.com/a", "https://example.com/dir/b"]
/// );
/// ```
pub fn extract_links(html: &str, current_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);

    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match resolve_href(href, current_url) {
            Ok(link) => {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
            Err(e) => {
                tracing::trace!("Skipping href '{}' on {}: {}", href, current_url, e);
            }
        }
    }

    links
}
