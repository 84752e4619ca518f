//! Sitemap document serialization
//!
//! Turns crawl records into a sitemaps.org `urlset` document, and reads the
//! page locations back out of one.

mod reader;
mod writer;

pub use reader::read_locations;
pub use writer::{write_sitemap, WriteError, SITEMAP_NAMESPACE};
