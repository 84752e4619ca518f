use crate::UrlError;
use url::{Origin, Url};

/// Parses and checks a crawl root URL
///
/// The root must be absolute, use `http` or `https`, and carry a host.
///
/// # Examples
///
/// ```
/// use sitemap_crawler::url::parse_root_url;
///
/// assert!(parse_root_url("https://example.com").is_ok());
/// assert!(parse_root_url("example.com").is_err());
/// assert!(parse_root_url("ftp://example.com").is_err());
/// ```
pub fn parse_root_url(root: &str) -> Result<Url, UrlError> {
    let url = Url::parse(root.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}

/// Decides whether a resolved candidate URL belongs to the crawl root's origin
///
/// Only the (scheme, host, port) triple is compared. Paths, query strings and
/// trailing slashes are irrelevant here, and unparseable candidates are
/// rejected.
///
/// # Examples
///
/// ```
/// use sitemap_crawler::url::is_same_origin;
/// use url::Url;
///
/// let root = Url::parse("https://example.com/").unwrap().origin();
/// assert!(is_same_origin("https://example.com/a?b=1", &root));
/// assert!(!is_same_origin("http://example.com/a", &root));
/// assert!(!is_same_origin("https://other.com/", &root));
/// ```
pub fn is_same_origin(candidate: &str, root_origin: &Origin) -> bool {
    match Url::parse(candidate) {
        Ok(url) => url.origin() == *root_origin,
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root_origin() -> Origin {
        Url::parse("https://example.com").unwrap().origin()
    }

    #[test]
    fn test_same_origin_accepts_paths_and_queries() {
        let origin = root_origin();
        assert!(is_same_origin("https://example.com/", &origin));
        assert!(is_same_origin("https://example.com/deep/page", &origin));
        assert!(is_same_origin("https://example.com/page?x=1", &origin));
        assert!(is_same_origin("https://example.com/page#top", &origin));
    }

    #[test]
    fn test_default_port_is_same_origin() {
        assert!(is_same_origin("https://example.com:443/a", &root_origin()));
    }

    #[test]
    fn test_scheme_mismatch_rejected() {
        assert!(!is_same_origin("http://example.com/", &root_origin()));
    }

    #[test]
    fn test_port_mismatch_rejected() {
        assert!(!is_same_origin("https://example.com:8443/", &root_origin()));
    }

    #[test]
    fn test_subdomain_rejected() {
        assert!(!is_same_origin("https://www.example.com/", &root_origin()));
        assert!(!is_same_origin("https://blog.example.com/", &root_origin()));
    }

    #[test]
    fn test_opaque_origins_rejected() {
        assert!(!is_same_origin("mailto:a@example.com", &root_origin()));
        assert!(!is_same_origin("javascript:void(0)", &root_origin()));
        assert!(!is_same_origin("data:text/plain,hi", &root_origin()));
    }

    #[test]
    fn test_unparseable_rejected() {
        assert!(!is_same_origin("http://[", &root_origin()));
        assert!(!is_same_origin("", &root_origin()));
    }

    #[test]
    fn test_parse_root_url() {
        let url = parse_root_url("  https://example.com/start  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/start");

        assert!(matches!(
            parse_root_url("/relative/path"),
            Err(UrlError::Parse(_))
        ));
        assert!(matches!(
            parse_root_url("ftp://example.com/"),
            Err(UrlError::InvalidScheme(_))
        ));
        assert!(matches!(
            parse_root_url("mailto:someone@example.com"),
            Err(UrlError::InvalidScheme(_))
        ));
    }
}
