//! URL handling module
//!
//! This module provides root URL validation, href resolution, the same-origin
//! filter used to scope a crawl, and host extraction for file naming.
//!
//! URLs are deliberately not normalized: two URLs that differ only by a
//! trailing slash or a query string are distinct pages.

mod domain;
mod origin;
mod resolve;

pub use domain::{extract_host, sitemap_file_name};
pub use origin::{is_same_origin, parse_root_url};
pub use resolve::resolve_href;
