use crate::crawler::ChangeFrequency;
use serde::Deserialize;

/// Default maximum crawl depth
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default per-request timeout (milliseconds)
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Default delay before each child fetch (milliseconds)
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 1_000;

/// Default number of child links followed per page
pub const DEFAULT_MAX_LINKS_PER_PAGE: usize = 10;

/// Default number of crawls allowed to run at the same time
pub const DEFAULT_MAX_CONCURRENT_CRAWLS: usize = 4;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum depth to crawl from the root URL
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Timeout for a single page fetch (milliseconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,

    /// Delay inserted before each child page fetch (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Maximum number of links followed from a single page
    #[serde(rename = "max-links-per-page")]
    pub max_links_per_page: usize,

    /// Maximum number of crawl invocations running at once
    #[serde(rename = "max-concurrent-crawls")]
    pub max_concurrent_crawls: usize,

    /// Optional wall-clock budget for a whole crawl (seconds)
    #[serde(rename = "crawl-budget")]
    pub crawl_budget: Option<u64>,

    /// Device profile used when a request does not name one
    #[serde(rename = "default-device")]
    pub default_device: String,

    /// `<changefreq>` written for every discovered page
    #[serde(rename = "change-frequency")]
    pub change_frequency: ChangeFrequency,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            request_timeout: DEFAULT_REQUEST_TIMEOUT_MS,
            request_delay: DEFAULT_REQUEST_DELAY_MS,
            max_links_per_page: DEFAULT_MAX_LINKS_PER_PAGE,
            max_concurrent_crawls: DEFAULT_MAX_CONCURRENT_CRAWLS,
            crawl_budget: None,
            default_device: "desktop".to_string(),
            change_frequency: ChangeFrequency::Weekly,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the SQLite database holding generated sitemaps
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Directory where sitemap XML files are written
    #[serde(rename = "output-dir")]
    pub output_dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            database_path: "sitemaps.db".to_string(),
            output_dir: ".".to_string(),
        }
    }
}
