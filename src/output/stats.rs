//! Crawl report for a generated sitemap
//!
//! Summarizes what a single crawl found for display on the terminal.

use crate::service::GeneratedSitemap;
use std::collections::BTreeMap;
use std::fmt::Write;

/// Figures derived from a generated sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlStatistics {
    /// Unique URLs listed in the sitemap
    pub urls_count: usize,

    /// Pages fetched successfully
    pub pages_fetched: usize,

    /// Pages whose fetch failed
    pub failed_fetches: usize,

    /// URLs per priority, keyed by priority in tenths (10 = 1.0)
    pub urls_by_priority: BTreeMap<u8, usize>,

    /// Whether the crawl stopped early on its budget
    pub budget_exhausted: bool,
}

impl CrawlStatistics {
    pub fn from_generated(generated: &GeneratedSitemap) -> Self {
        let mut urls_by_priority = BTreeMap::new();
        for record in &generated.records {
            let tenths = (record.priority * 10.0).round() as u8;
            *urls_by_priority.entry(tenths).or_insert(0) += 1;
        }

        Self {
            urls_count: generated.urls_count(),
            pages_fetched: generated.pages_fetched,
            failed_fetches: generated.failed_fetches,
            urls_by_priority,
            budget_exhausted: generated.budget_exhausted,
        }
    }

    /// Share of attempted fetches that succeeded, in percent
    pub fn success_rate(&self) -> f64 {
        let attempted = self.pages_fetched + self.failed_fetches;
        if attempted == 0 {
            0.0
        } else {
            (self.pages_fetched as f64 / attempted as f64) * 100.0
        }
    }
}

/// Renders a human-readable crawl report
pub fn format_statistics(website_url: &str, device: &str, stats: &CrawlStatistics) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Sitemap for {} ({}) ===\n", website_url, device);
    let _ = writeln!(out, "  URLs in sitemap: {}", stats.urls_count);
    let _ = writeln!(out, "  Pages fetched: {}", stats.pages_fetched);
    let _ = writeln!(out, "  Failed fetches: {}", stats.failed_fetches);
    let _ = writeln!(
        out,
        "  Success rate: {:.1}%",
        stats.success_rate()
    );

    if !stats.urls_by_priority.is_empty() {
        let _ = writeln!(out, "\nURLs by Priority:");
        for (tenths, count) in stats.urls_by_priority.iter().rev() {
            let _ = writeln!(out, "  {:.1}: {}", f64::from(*tenths) / 10.0, count);
        }
    }

    if stats.budget_exhausted {
        let _ = writeln!(out, "\nCrawl budget exhausted: the sitemap is partial");
    }

    out
}

/// Prints the crawl report to stdout
pub fn print_statistics(generated: &GeneratedSitemap) {
    let stats = CrawlStatistics::from_generated(generated);
    print!(
        "{}",
        format_statistics(&generated.website_url, generated.device.name(), &stats)
    );
}
