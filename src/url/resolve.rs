use crate::UrlError;
use url::Url;

/// Resolves a raw `href` attribute against the page it was found on
///
/// # Resolution Rules
///
/// | href | Result |
/// |------|--------|
/// | starts with `http` | used as written, once it parses as a URL |
/// | starts with `/` | joined onto the current page's origin |
/// | anything else | joined onto the current page's full URL |
///
/// Resolved URLs that are not `http`/`https` are rejected. An `Err` means the
/// single link is skipped; callers never fail the page because of it.
///
/// # Examples
///
/// ```
/// use sitemap_crawler::url::resolve_href;
/// use url::Url;
///
/// let page = Url::parse("https://example.com/docs/intro").unwrap();
/// assert_eq!(resolve_href("/about", &page).unwrap(), "https://example.com/about");
/// assert_eq!(resolve_href("setup", &page).unwrap(), "https://example.com/docs/setup");
/// assert!(resolve_href("http://[", &page).is_err());
/// ```
pub fn resolve_href(href: &str, current: &Url) -> Result<String, UrlError> {
    let href = href.trim();

    if href.is_empty() {
        return Err(UrlError::Empty);
    }

    if href.starts_with("http") {
        check_scheme(&parse(href)?)?;
        return Ok(href.to_string());
    }

    let base = if href.starts_with('/') {
        parse(&current.origin().ascii_serialization())?
    } else {
        current.clone()
    };

    let resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;

    check_scheme(&resolved)?;
    Ok(resolved.to_string())
}

fn parse(url: &str) -> Result<Url, UrlError> {
    Url::parse(url).map_err(|e| UrlError::Parse(e.to_string()))
}

fn check_scheme(url: &Url) -> Result<(), UrlError> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(UrlError::InvalidScheme(other.to_string())),
    }
}
