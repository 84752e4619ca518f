//! Sitemap generation service
//!
//! The boundary between callers (the CLI) and the crawl core. It validates
//! requests, bounds how many crawls run at once, serializes the result, and
//! keeps the history of generated sitemaps.

mod limiter;

pub use limiter::CrawlLimiter;

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::{CrawlEngine, CrawlOptions, DeviceProfile, Fetch, HttpFetcher, PageRecord};
use crate::sitemap::{read_locations, write_sitemap};
use crate::storage::{
    NewSitemap, SitemapStore, SitemapSummary, SqliteStorage, StorageError, StoredSitemap,
};
use crate::url::{parse_root_url, sitemap_file_name};
use crate::SitemapError;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// A request to map one website
///
/// Every unset field falls back to the service configuration.
#[derive(Debug, Clone, Default)]
pub struct CrawlRequest {
    pub website_url: String,
    pub device: Option<String>,
    pub max_depth: Option<u32>,
    pub request_timeout_ms: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub crawl_budget_secs: Option<u64>,
}

impl CrawlRequest {
    pub fn new(website_url: impl Into<String>) -> Self {
        Self {
            website_url: website_url.into(),
            ..Self::default()
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

/// A sitemap produced by [`SitemapService::generate`]
#[derive(Debug, Clone)]
pub struct GeneratedSitemap {
    /// Root URL as requested
    pub website_url: String,
    pub device: DeviceProfile,
    pub sitemap_xml: String,
    pub records: Vec<PageRecord>,
    pub pages_fetched: usize,
    pub failed_fetches: usize,
    pub budget_exhausted: bool,
    /// Hash of the configuration the crawl ran with
    pub config_hash: String,
}

impl GeneratedSitemap {
    pub fn urls_count(&self) -> usize {
        self.records.len()
    }

    /// True when some pages could not be fetched or the budget ran out
    pub fn is_partial(&self) -> bool {
        self.failed_fetches > 0 || self.budget_exhausted
    }

    /// File name the document is saved under
    pub fn file_name(&self) -> String {
        sitemap_file_name(&self.website_url)
    }
}

/// Generates sitemaps and keeps their history
pub struct SitemapService {
    config: Arc<Config>,
    config_hash: String,
    limiter: CrawlLimiter,
    storage: Option<Arc<Mutex<SqliteStorage>>>,
}

impl SitemapService {
    /// Creates a service without a history store
    pub fn new(config: Config, config_hash: impl Into<String>) -> Self {
        let limiter = CrawlLimiter::new(config.crawler.max_concurrent_crawls);
        Self {
            config: Arc::new(config),
            config_hash: config_hash.into(),
            limiter,
            storage: None,
        }
    }

    /// Attaches the store used by [`persist`](Self::persist) and the history queries
    pub fn with_storage(mut self, storage: SqliteStorage) -> Self {
        self.storage = Some(Arc::new(Mutex::new(storage)));
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn limiter(&self) -> &CrawlLimiter {
        &self.limiter
    }

    /// Crawls the requested site over HTTP and serializes the result
    ///
    /// # Errors
    ///
    /// * `SitemapError::InvalidRootUrl` - The URL is not an absolute http(s) URL with a host
    /// * `SitemapError::Config` - A per-request override is out of range
    /// * `SitemapError::Reqwest` - The HTTP client could not be built
    ///
    /// Unreachable pages are not errors: they only make the sitemap smaller.
    pub async fn generate(&self, request: CrawlRequest) -> Result<GeneratedSitemap, SitemapError> {
        let (website_url, settings) = self.prepare(&request)?;
        let profile = self.resolve_device(&request, &settings);
        let fetcher = HttpFetcher::new(profile, Duration::from_millis(settings.request_timeout))?;
        self.generate_with(fetcher, website_url, profile, &settings)
            .await
    }

    /// Validates the request and merges its overrides into the configuration
    fn prepare(&self, request: &CrawlRequest) -> Result<(String, CrawlerConfig), SitemapError> {
        let website_url = request.website_url.trim().to_string();
        parse_root_url(&website_url).map_err(|source| SitemapError::InvalidRootUrl {
            url: website_url.clone(),
            source,
        })?;

        let mut settings = self.config.crawler.clone();
        if let Some(max_depth) = request.max_depth {
            settings.max_depth = max_depth;
        }
        if let Some(timeout) = request.request_timeout_ms {
            settings.request_timeout = timeout;
        }
        if let Some(delay) = request.request_delay_ms {
            settings.request_delay = delay;
        }
        if let Some(budget) = request.crawl_budget_secs {
            settings.crawl_budget = Some(budget);
        }

        validate(&Config {
            crawler: settings.clone(),
            output: self.config.output.clone(),
        })?;

        Ok((website_url, settings))
    }

    fn resolve_device(&self, request: &CrawlRequest, settings: &CrawlerConfig) -> DeviceProfile {
        let default = DeviceProfile::from_name(&settings.default_device).unwrap_or_default();
        match request.device.as_deref() {
            Some(name) => DeviceProfile::from_name_or(name, default),
            None => default,
        }
    }

    async fn generate_with<F: Fetch>(
        &self,
        fetcher: F,
        website_url: String,
        profile: DeviceProfile,
        settings: &CrawlerConfig,
    ) -> Result<GeneratedSitemap, SitemapError> {
        let permit = self.limiter.acquire().await?;
        tracing::info!("Generating sitemap for {} as {}", website_url, profile);

        let engine = CrawlEngine::new(fetcher, CrawlOptions::from_config(settings));
        let result = engine.crawl(&website_url).await;
        drop(permit);

        if result.is_empty() {
            tracing::warn!("No pages discovered for {}", website_url);
        }

        let sitemap_xml = write_sitemap(&result.records)?;

        Ok(GeneratedSitemap {
            website_url,
            device: profile,
            sitemap_xml,
            records: result.records,
            pages_fetched: result.pages_fetched,
            failed_fetches: result.failed_fetches,
            budget_exhausted: result.budget_exhausted,
            config_hash: self.config_hash.clone(),
        })
    }

    /// Stores a generated sitemap and returns its ID
    pub fn persist(&self, generated: &GeneratedSitemap) -> Result<i64, SitemapError> {
        let id = self.lock_storage()?.insert_sitemap(&NewSitemap {
            website_url: generated.website_url.clone(),
            device_type: generated.device.name().to_string(),
            sitemap_xml: generated.sitemap_xml.clone(),
            urls_count: generated.urls_count(),
            config_hash: generated.config_hash.clone(),
        })?;

        tracing::info!(
            "Stored sitemap {} for {} ({} URLs)",
            id,
            generated.website_url,
            generated.urls_count()
        );
        Ok(id)
    }

    /// Most recent sitemaps, newest first
    pub fn history(&self, limit: usize) -> Result<Vec<SitemapSummary>, SitemapError> {
        Ok(self.lock_storage()?.list_sitemaps(limit)?)
    }

    /// A stored sitemap with its document
    pub fn get(&self, id: i64) -> Result<StoredSitemap, SitemapError> {
        self.lock_storage()?.get_sitemap(id).map_err(|e| match e {
            StorageError::SitemapNotFound(id) => SitemapError::NotFound(id),
            other => other.into(),
        })
    }

    /// A stored sitemap whose document still parses and lists `urls_count` URLs
    pub fn download(&self, id: i64) -> Result<StoredSitemap, SitemapError> {
        let stored = self.get(id)?;
        let locations = read_locations(&stored.sitemap_xml).map_err(|e| {
            SitemapError::CorruptSitemap {
                id,
                reason: e.to_string(),
            }
        })?;
        if locations.len() != stored.urls_count {
            return Err(SitemapError::CorruptSitemap {
                id,
                reason: format!(
                    "document lists {} URLs, {} were recorded",
                    locations.len(),
                    stored.urls_count
                ),
            });
        }
        Ok(stored)
    }

    pub fn count(&self) -> Result<u64, SitemapError> {
        Ok(self.lock_storage()?.count_sitemaps()?)
    }

    fn lock_storage(&self) -> Result<MutexGuard<'_, SqliteStorage>, SitemapError> {
        let storage = self.storage.as_ref().ok_or(SitemapError::StorageDisabled)?;
        storage
            .lock()
            .map_err(|_| SitemapError::from(StorageError::Database("storage lock poisoned".to_string())))
    }
}
