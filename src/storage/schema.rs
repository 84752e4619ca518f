//! Database schema definitions
//!
//! This module contains the SQL schema for the sitemap history database.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Every generated sitemap, with the crawl parameters that produced it
CREATE TABLE IF NOT EXISTS sitemaps (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    website_url TEXT NOT NULL,
    device_type TEXT NOT NULL,
    sitemap_xml TEXT NOT NULL,
    urls_count INTEGER NOT NULL DEFAULT 0,
    config_hash TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_sitemaps_created ON sitemaps(created_at);
CREATE INDEX IF NOT EXISTS idx_sitemaps_website ON sitemaps(website_url);
"#;

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Gets the current schema version
pub fn get_schema_version() -> u32 {
    1
}
