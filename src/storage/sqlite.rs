//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the SitemapStore trait.

use crate::storage::schema::initialize_schema;
use crate::storage::traits::{SitemapStore, StorageError, StorageResult};
use crate::storage::{NewSitemap, SitemapSummary, StoredSitemap};
use crate::SitemapError;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// Missing parent directories of `path` are created.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(SitemapError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, SitemapError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;
        tracing::debug!("Opened sitemap database at {}", path.display());

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, SitemapError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Row shape shared by the summary queries, before timestamp parsing
struct SummaryRow {
    id: i64,
    website_url: String,
    device_type: String,
    urls_count: i64,
    created_at: String,
}

impl SummaryRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            website_url: row.get(1)?,
            device_type: row.get(2)?,
            urls_count: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_summary(self) -> StorageResult<SitemapSummary> {
        Ok(SitemapSummary {
            id: self.id,
            website_url: self.website_url,
            device_type: self.device_type,
            urls_count: count_from_db(self.urls_count),
            created_at: parse_timestamp(&self.created_at)?,
        })
    }
}

impl SitemapStore for SqliteStorage {
    fn insert_sitemap(&mut self, sitemap: &NewSitemap) -> StorageResult<i64> {
        // Fixed-width timestamps keep text ordering chronological
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        self.conn.execute(
            "INSERT INTO sitemaps (website_url, device_type, sitemap_xml, urls_count, config_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                sitemap.website_url,
                sitemap.device_type,
                sitemap.sitemap_xml,
                i64::try_from(sitemap.urls_count).unwrap_or(i64::MAX),
                sitemap.config_hash,
                now
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_sitemap(&self, id: i64) -> StorageResult<StoredSitemap> {
        let mut stmt = self.conn.prepare(
            "SELECT id, website_url, device_type, urls_count, created_at, sitemap_xml, config_hash
             FROM sitemaps WHERE id = ?1",
        )?;

        let row = stmt
            .query_row(params![id], |row| {
                Ok((SummaryRow::from_row(row)?, row.get::<_, String>(5)?, row.get::<_, String>(6)?))
            })
            .optional()?;

        let (summary, sitemap_xml, config_hash) = row.ok_or(StorageError::SitemapNotFound(id))?;
        let summary = summary.into_summary()?;

        Ok(StoredSitemap {
            id: summary.id,
            website_url: summary.website_url,
            device_type: summary.device_type,
            sitemap_xml,
            urls_count: summary.urls_count,
            config_hash,
            created_at: summary.created_at,
        })
    }

    fn list_sitemaps(&self, limit: usize) -> StorageResult<Vec<SitemapSummary>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, website_url, device_type, urls_count, created_at
             FROM sitemaps ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;

        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], SummaryRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(SummaryRow::into_summary).collect()
    }

    fn count_sitemaps(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sitemaps", [], |row| row.get(0))?;
        Ok(count_from_db(count) as u64)
    }
}

fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| StorageError::InvalidTimestamp(value.to_string()))
}

fn count_from_db(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_sitemap(url: &str, urls_count: usize) -> NewSitemap {
        NewSitemap {
            website_url: url.to_string(),
            device_type: "desktop".to_string(),
            sitemap_xml: format!("<urlset><url><loc>{}</loc></url></urlset>", url),
            urls_count,
            config_hash: "hash123".to_string(),
        }
    }

    #[test]
    fn test_create_in_memory() {
        let storage = SqliteStorage::new_in_memory();
        assert!(storage.is_ok());
    }

    #[test]
    fn test_insert_and_get() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let id = storage
            .insert_sitemap(&new_sitemap("https://example.com", 4))
            .unwrap();
        assert!(id > 0);

        let stored = storage.get_sitemap(id).unwrap();
        assert_eq!(stored.id, id);
        assert_eq!(stored.website_url, "https://example.com");
        assert_eq!(stored.device_type, "desktop");
        assert_eq!(stored.urls_count, 4);
        assert_eq!(stored.config_hash, "hash123");
        assert!(stored.sitemap_xml.contains("<loc>https://example.com</loc>"));
    }

    #[test]
    fn test_get_missing_sitemap() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        let result = storage.get_sitemap(42);
        assert!(matches!(result, Err(StorageError::SitemapNotFound(42))));
    }

    #[test]
    fn test_list_newest_first_with_limit() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.insert_sitemap(&new_sitemap("https://a.example.com", 1)).unwrap();
        let second = storage.insert_sitemap(&new_sitemap("https://b.example.com", 2)).unwrap();
        let third = storage.insert_sitemap(&new_sitemap("https://c.example.com", 3)).unwrap();

        let all = storage.list_sitemaps(10).unwrap();
        let ids: Vec<i64> = all.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![third, second, first]);

        let limited = storage.list_sitemaps(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].website_url, "https://c.example.com");
    }

    #[test]
    fn test_count_sitemaps() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert_eq!(storage.count_sitemaps().unwrap(), 0);

        storage.insert_sitemap(&new_sitemap("https://example.com", 1)).unwrap();
        storage.insert_sitemap(&new_sitemap("https://example.com", 1)).unwrap();
        assert_eq!(storage.count_sitemaps().unwrap(), 2);
    }

    #[test]
    fn test_persists_across_connections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("sitemaps.db");

        let id = {
            let mut storage = SqliteStorage::new(&path).unwrap();
            storage.insert_sitemap(&new_sitemap("https://example.com", 5)).unwrap()
        };

        let storage = SqliteStorage::new(&path).unwrap();
        assert_eq!(storage.get_sitemap(id).unwrap().urls_count, 5);
    }

    #[test]
    fn test_parse_timestamp() {
        assert!(parse_timestamp("2024-03-01T12:30:00+00:00").is_ok());
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(StorageError::InvalidTimestamp(_))
        ));
    }
}
