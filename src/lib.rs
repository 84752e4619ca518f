//! Sitemap Crawler: a polite same-origin site mapper
//!
//! This crate walks a website from a root URL, following same-origin links up
//! to a depth bound, and turns the discovered pages into a sitemap document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod service;
pub mod sitemap;
pub mod storage;
pub mod url;

use thiserror::Error;

/// Main error type for sitemap crawler operations
#[derive(Debug, Error)]
pub enum SitemapError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid root URL '{url}': {source}")]
    InvalidRootUrl { url: String, source: UrlError },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::StorageError),

    #[error("Sitemap serialization error: {0}")]
    Serialize(#[from] sitemap::WriteError),

    #[error("Sitemap {0} not found")]
    NotFound(i64),

    #[error("Stored sitemap {id} is corrupt: {reason}")]
    CorruptSitemap { id: i64, reason: String },

    #[error("Crawl limiter was shut down")]
    LimiterClosed,

    #[error("No sitemap store configured")]
    StorageDisabled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unknown device profile: {0}")]
    UnknownDevice(String),
}

/// URL-specific errors
///
/// Also used as the reason a single href is skipped during link extraction.
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Empty href")]
    Empty,
}

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlEngine, CrawlOptions, CrawlResult, DeviceProfile, PageRecord};
pub use service::{CrawlRequest, GeneratedSitemap, SitemapService};
pub use url::{is_same_origin, parse_root_url};
