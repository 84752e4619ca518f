//! Storage module for persisting generated sitemaps
//!
//! This module handles all database operations, including:
//! - SQLite database initialization and schema management
//! - Storing generated sitemaps with their crawl parameters
//! - Listing and retrieving past sitemaps

mod schema;
mod sqlite;
mod traits;

pub use sqlite::SqliteStorage;
pub use traits::{SitemapStore, StorageError, StorageResult};

use crate::SitemapError;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Initializes or opens a storage database
///
/// # Arguments
///
/// * `path` - Path to the SQLite database file
///
/// # Returns
///
/// * `Ok(SqliteStorage)` - Successfully initialized storage
/// * `Err(SitemapError)` - Failed to initialize storage
pub fn open_storage(path: &Path) -> Result<SqliteStorage, SitemapError> {
    SqliteStorage::new(path)
}

/// A sitemap about to be stored
#[derive(Debug, Clone)]
pub struct NewSitemap {
    pub website_url: String,
    pub device_type: String,
    pub sitemap_xml: String,
    pub urls_count: usize,
    pub config_hash: String,
}

/// A stored sitemap, document included
#[derive(Debug, Clone)]
pub struct StoredSitemap {
    pub id: i64,
    pub website_url: String,
    pub device_type: String,
    pub sitemap_xml: String,
    pub urls_count: usize,
    pub config_hash: String,
    pub created_at: DateTime<Utc>,
}

/// History entry for a stored sitemap
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapSummary {
    pub id: i64,
    pub website_url: String,
    pub device_type: String,
    pub urls_count: usize,
    pub created_at: DateTime<Utc>,
}

impl StoredSitemap {
    /// File name used when the document is downloaded
    pub fn file_name(&self) -> String {
        crate::url::sitemap_file_name(&self.website_url)
    }
}

impl From<&StoredSitemap> for SitemapSummary {
    fn from(stored: &StoredSitemap) -> Self {
        Self {
            id: stored.id,
            website_url: stored.website_url.clone(),
            device_type: stored.device_type.clone(),
            urls_count: stored.urls_count,
            created_at: stored.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> StoredSitemap {
        StoredSitemap {
            id: 7,
            website_url: "https://Docs.Example.com/guide".to_string(),
            device_type: "mobile".to_string(),
            sitemap_xml: "<urlset/>".to_string(),
            urls_count: 3,
            config_hash: "abc".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_file_name_uses_host() {
        assert_eq!(stored().file_name(), "sitemap-docs.example.com.xml");
    }

    #[test]
    fn test_summary_from_stored() {
        let stored = stored();
        let summary = SitemapSummary::from(&stored);
        assert_eq!(summary.id, 7);
        assert_eq!(summary.urls_count, 3);
        assert_eq!(summary.device_type, "mobile");
    }
}
