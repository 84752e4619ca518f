//! Crawl engine - depth-bounded same-origin traversal
//!
//! The engine walks a site depth-first from a root URL, one request at a
//! time, and returns the pages it discovered as sitemap records.
//!
//! # Traversal
//!
//! 1. A node is skipped when it is deeper than `max_depth` or was already
//!    visited. The visited set spans the whole crawl, not one branch.
//! 2. The URL is marked visited before it is fetched.
//! 3. A failed fetch contributes nothing; the crawl carries on.
//! 4. Links are extracted, resolved, and kept only when they share the
//!    root's origin.
//! 5. The node emits one record per kept link followed by its own record.
//!    Pages at the deepest level still list their links; only a crawl with
//!    `max_depth == 0` reports the root alone.
//! 6. Below `max_depth`, the first `max_links_per_page` kept links become
//!    children, each fetched after `request_delay`.
//! 7. Records are deduplicated by URL at the end; the first one wins.
//!
//! Children are pushed onto an explicit stack in reverse so they pop in
//! discovery order, which yields the same pre-order (and the same record
//! order) as recursing into each child before moving to its next sibling.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::Fetch;
use crate::crawler::parser::extract_links;
use crate::crawler::record::{dedup_by_url, ChangeFrequency, PageRecord};
use crate::url::is_same_origin;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;
use url::{Origin, Url};

/// Knobs for a single crawl invocation
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlOptions {
    /// Deepest level fetched; the root is depth 0
    pub max_depth: u32,

    /// Children followed per page
    pub max_links_per_page: usize,

    /// Pause before each child fetch
    pub request_delay: Duration,

    /// Wall-clock budget for the whole crawl
    pub budget: Option<Duration>,

    /// Change frequency stamped on every record
    pub change_frequency: ChangeFrequency,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

impl CrawlOptions {
    /// Builds options from the crawler section of the configuration
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_depth: config.max_depth,
            max_links_per_page: config.max_links_per_page,
            request_delay: Duration::from_millis(config.request_delay),
            budget: config.crawl_budget.map(Duration::from_secs),
            change_frequency: config.change_frequency,
        }
    }
}

/// Outcome of a crawl
///
/// A crawl never fails: unreachable pages only make the result smaller.
#[derive(Debug, Clone, Default)]
pub struct CrawlResult {
    /// Root URL the crawl started from, as given
    pub root_url: String,

    /// Discovered pages, deduplicated by URL, in discovery order
    pub records: Vec<PageRecord>,

    /// Pages fetched successfully
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub failed_fetches: usize,

    /// Whether the crawl stopped early because its budget ran out
    pub budget_exhausted: bool,
}

impl CrawlResult {
    /// Number of unique URLs discovered
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when nothing was discovered (e.g. the root was unreachable)
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when some branch was lost to a failed fetch or the budget
    pub fn is_partial(&self) -> bool {
        self.failed_fetches > 0 || self.budget_exhausted
    }

    /// Iterates over the discovered URLs
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.url.as_str())
    }
}

/// A pending visit on the traversal stack
#[derive(Debug)]
struct Frame {
    url: String,
    depth: u32,
}

#[derive(Debug, Default)]
struct Traversal {
    records: Vec<PageRecord>,
    pages_fetched: usize,
    failed_fetches: usize,
    budget_exhausted: bool,
}

/// Sequential, depth-first site crawler
pub struct CrawlEngine<F> {
    fetcher: F,
    options: CrawlOptions,
}

impl<F: Fetch> CrawlEngine<F> {
    /// Creates an engine around a fetcher
    pub fn new(fetcher: F, options: CrawlOptions) -> Self {
        Self { fetcher, options }
    }

    /// The options every crawl of this engine uses
    pub fn options(&self) -> &CrawlOptions {
        &self.options
    }

    /// The underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Crawls the site below `root_url`
    ///
    /// The root is kept exactly as given in the records. A root that does not
    /// parse yields an empty result; callers are expected to validate it
    /// first (see [`crate::url::parse_root_url`]).
    pub async fn crawl(&self, root_url: &str) -> CrawlResult {
        let root_origin = match Url::parse(root_url) {
            Ok(url) => url.origin(),
            Err(e) => {
                tracing::warn!("Cannot crawl invalid root URL {}: {}", root_url, e);
                return CrawlResult {
                    root_url: root_url.to_string(),
                    ..CrawlResult::default()
                };
            }
        };

        tracing::info!(
            "Starting crawl of {} (max depth {}, {} links per page)",
            root_url,
            self.options.max_depth,
            self.options.max_links_per_page
        );
        let start_time = Instant::now();

        let traversal = self.traverse(root_url, &root_origin).await;
        let discovered = traversal.records.len();
        let records = dedup_by_url(traversal.records);

        tracing::info!(
            "Crawl of {} finished: {} unique URLs ({} records), {} pages fetched, {} failed, in {:?}",
            root_url,
            records.len(),
            discovered,
            traversal.pages_fetched,
            traversal.failed_fetches,
            start_time.elapsed()
        );

        CrawlResult {
            root_url: root_url.to_string(),
            records,
            pages_fetched: traversal.pages_fetched,
            failed_fetches: traversal.failed_fetches,
            budget_exhausted: traversal.budget_exhausted,
        }
    }

    /// Walks the site and returns every record produced, duplicates included
    async fn traverse(&self, root_url: &str, root_origin: &Origin) -> Traversal {
        let started = Instant::now();
        let mut traversal = Traversal::default();
        let mut visited: HashSet<String> = HashSet::new();
        let mut stack = vec![Frame {
            url: root_url.to_string(),
            depth: 0,
        }];

        while let Some(frame) = stack.pop() {
            if self.budget_exceeded(started) {
                traversal.budget_exhausted = true;
                break;
            }

            if frame.depth > self.options.max_depth || visited.contains(&frame.url) {
                continue;
            }

            if frame.depth > 0 && !self.options.request_delay.is_zero() {
                tokio::time::sleep(self.options.request_delay).await;
                if self.budget_exceeded(started) {
                    traversal.budget_exhausted = true;
                    break;
                }
            }

            visited.insert(frame.url.clone());
            tracing::debug!("Fetching {} (depth {})", frame.url, frame.depth);

            let body = match self.fetcher.fetch(&frame.url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!("Error crawling {}: {}", frame.url, e);
                    traversal.failed_fetches += 1;
                    continue;
                }
            };
            traversal.pages_fetched += 1;

            let links = self.same_origin_links(&frame.url, &body, root_origin);
            let crawled_at = Utc::now();

            if self.options.max_depth > 0 {
                traversal
                    .records
                    .extend(links.iter().map(|link| self.record(link, frame.depth, crawled_at)));
            }
            let own = self.record(&frame.url, frame.depth, crawled_at);
            traversal.records.push(own);

            if frame.depth < self.options.max_depth {
                let children: Vec<String> = links
                    .into_iter()
                    .take(self.options.max_links_per_page)
                    .collect();
                tracing::debug!(
                    "{}: following {} link(s) to depth {}",
                    frame.url,
                    children.len(),
                    frame.depth + 1
                );
                stack.extend(children.into_iter().rev().map(|url| Frame {
                    url,
                    depth: frame.depth + 1,
                }));
            }
        }

        if traversal.budget_exhausted {
            tracing::warn!(
                "Crawl budget of {:?} exhausted for {}, returning partial result",
                self.options.budget.unwrap_or_default(),
                root_url
            );
        }

        traversal
    }

    /// Extracts the links of a fetched page that share the root's origin
    fn same_origin_links(&self, page_url: &str, body: &str, root_origin: &Origin) -> Vec<String> {
        let current = match Url::parse(page_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Cannot resolve links on {}: {}", page_url, e);
                return Vec::new();
            }
        };

        extract_links(body, &current)
            .into_iter()
            .filter(|link| is_same_origin(link, root_origin))
            .collect()
    }

    fn record(&self, url: &str, depth: u32, crawled_at: DateTime<Utc>) -> PageRecord {
        PageRecord::new(url, depth, crawled_at)
            .with_change_frequency(self.options.change_frequency)
    }

    fn budget_exceeded(&self, started: Instant) -> bool {
        self.options
            .budget
            .map_or(false, |budget| started.elapsed() >= budget)
    }
}
