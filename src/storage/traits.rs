//! Storage traits and error types
//!
//! This module defines the trait interface for sitemap history backends and
//! associated error types.

use crate::storage::{NewSitemap, SitemapSummary, StoredSitemap};
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Sitemap not found: {0}")]
    SitemapNotFound(i64),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for sitemap history backends
pub trait SitemapStore {
    /// Stores a generated sitemap
    ///
    /// # Returns
    ///
    /// The ID of the newly stored sitemap
    fn insert_sitemap(&mut self, sitemap: &NewSitemap) -> StorageResult<i64>;

    /// Gets a sitemap, including its XML document, by ID
    fn get_sitemap(&self, id: i64) -> StorageResult<StoredSitemap>;

    /// Lists up to `limit` sitemaps, newest first, without their documents
    fn list_sitemaps(&self, limit: usize) -> StorageResult<Vec<SitemapSummary>>;

    /// Counts stored sitemaps
    fn count_sitemaps(&self) -> StorageResult<u64>;
}
