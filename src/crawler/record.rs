//! Page records produced by a crawl

use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;

/// Lowest priority any record is given, however deep it was found
pub const PRIORITY_FLOOR: f64 = 0.2;

/// How often a page is expected to change
///
/// Read from the `change-frequency` configuration key as a lowercase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Value written into `<changefreq>`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One discovered URL with its sitemap metadata
#[derive(Debug, Clone, PartialEq)]
pub struct PageRecord {
    /// Absolute URL of the page
    pub url: String,

    /// When the record was produced
    pub last_modified: DateTime<Utc>,

    /// Expected change frequency (weekly unless configured otherwise)
    pub change_frequency: ChangeFrequency,

    /// Relative importance in `[0.2, 1.0]`
    pub priority: f64,

    /// Depth of the page that produced this record
    pub depth: u32,
}

impl PageRecord {
    /// Creates a record for `url` found at `depth`
    pub fn new(url: impl Into<String>, depth: u32, crawled_at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            last_modified: crawled_at,
            change_frequency: ChangeFrequency::Weekly,
            priority: priority_for_depth(depth),
            depth,
        }
    }

    /// Replaces the change frequency
    pub fn with_change_frequency(mut self, change_frequency: ChangeFrequency) -> Self {
        self.change_frequency = change_frequency;
        self
    }
}

/// Sitemap priority for a record produced at `depth`
///
/// `1.0` at the root, then `0.8 - 0.2 * depth`, never below
/// [`PRIORITY_FLOOR`]. Computed in tenths so values are exact to one decimal.
///
/// # Examples
///
/// ```
/// use sitemap_crawler::crawler::priority_for_depth;
///
/// assert_eq!(priority_for_depth(0), 1.0);
/// assert_eq!(priority_for_depth(1), 0.6);
/// assert_eq!(priority_for_depth(2), 0.4);
/// assert_eq!(priority_for_depth(7), 0.2);
/// ```
pub fn priority_for_depth(depth: u32) -> f64 {
    if depth == 0 {
        return 1.0;
    }

    let tenths = 8i64 - 2 * i64::from(depth);
    (tenths as f64 / 10.0).max(PRIORITY_FLOOR)
}

/// Removes records whose URL was already seen, keeping the first occurrence
/// and the original order
pub fn dedup_by_url(records: Vec<PageRecord>) -> Vec<PageRecord> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.url.clone()))
        .collect()
}
