//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every key has a default, so running without a file is supported.
//!
//! # Example
//!
//! ```no_run
//! use sitemap_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitemap.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, DEFAULT_MAX_CONCURRENT_CRAWLS, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_LINKS_PER_PAGE, DEFAULT_REQUEST_DELAY_MS, DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, load_config_with_hash, load_or_default, parse_config,
};
pub use validation::validate;
