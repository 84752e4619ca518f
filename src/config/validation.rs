use crate::config::types::{Config, CrawlerConfig, OutputConfig};
use crate::crawler::DeviceProfile;
use crate::ConfigError;

/// Deepest crawl the configuration accepts
const MAX_ALLOWED_DEPTH: u32 = 10;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_output_config(&config.output)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_depth > MAX_ALLOWED_DEPTH {
        return Err(ConfigError::Validation(format!(
            "max_depth must be <= {}, got {}",
            MAX_ALLOWED_DEPTH, config.max_depth
        )));
    }

    if config.request_timeout < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout must be >= 100ms, got {}ms",
            config.request_timeout
        )));
    }

    if config.request_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay must be <= 60000ms, got {}ms",
            config.request_delay
        )));
    }

    if config.max_links_per_page < 1 {
        return Err(ConfigError::Validation(format!(
            "max_links_per_page must be >= 1, got {}",
            config.max_links_per_page
        )));
    }

    if config.max_concurrent_crawls < 1 || config.max_concurrent_crawls > 100 {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_crawls must be between 1 and 100, got {}",
            config.max_concurrent_crawls
        )));
    }

    if config.crawl_budget == Some(0) {
        return Err(ConfigError::Validation(
            "crawl_budget must be at least 1 second when set".to_string(),
        ));
    }

    validate_device(&config.default_device)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty".to_string(),
        ));
    }

    if config.output_dir.is_empty() {
        return Err(ConfigError::Validation(
            "output_dir cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// The configured default must name a catalog entry; unknown names are only
/// tolerated on individual requests
fn validate_device(name: &str) -> Result<(), ConfigError> {
    DeviceProfile::from_name(name)
        .map(|_| ())
        .ok_or_else(|| ConfigError::UnknownDevice(name.to_string()))
}
