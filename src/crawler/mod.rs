//! Crawler module for page fetching and site traversal
//!
//! This module contains the core crawling logic, including:
//! - Device profiles and the HTTP fetcher that presents them
//! - HTML parsing and link extraction
//! - Page records and their sitemap priority
//! - The depth-bounded crawl engine

mod engine;
mod fetcher;
mod parser;
mod profile;
mod record;

pub use engine::{CrawlEngine, CrawlOptions, CrawlResult};
pub use fetcher::{build_http_client, Fetch, FetchError, HttpFetcher, MAX_BODY_BYTES};
pub use parser::extract_links;
pub use profile::DeviceProfile;
pub use record::{dedup_by_url, priority_for_depth, ChangeFrequency, PageRecord, PRIORITY_FLOOR};

