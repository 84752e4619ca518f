use url::Url;

/// Extracts the lowercase host from a URL string
///
/// # Examples
///
/// ```
/// use sitemap_crawler::url::extract_host;
///
/// assert_eq!(extract_host("https://Example.COM/path"), Some("example.com".to_string()));
/// assert_eq!(extract_host("not a url"), None);
/// ```
pub fn extract_host(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
}

/// File name a sitemap for `website_url` is saved under
///
/// Falls back to `sitemap.xml` when the stored URL has no usable host.
pub fn sitemap_file_name(website_url: &str) -> String {
    match extract_host(website_url) {
        Some(host) => format!("sitemap-{}.xml", host),
        None => "sitemap.xml".to_string(),
    }
}
