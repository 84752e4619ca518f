//! Output module for presenting and saving sitemaps
//!
//! This module handles:
//! - Writing sitemap documents to the output directory
//! - Printing crawl reports
//! - Printing the sitemap history

mod history;
pub mod stats;

pub use history::{format_history, print_history};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};

use crate::SitemapError;
use std::path::{Path, PathBuf};

/// Writes a sitemap document into `output_dir`
///
/// The directory is created when missing and an existing file of the same
/// name is replaced.
///
/// # Arguments
///
/// * `output_dir` - Directory the file is written to
/// * `file_name` - File name, usually `sitemap-<host>.xml`
/// * `sitemap_xml` - Document to write
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written file
/// * `Err(SitemapError)` - Failed to create the directory or write the file
pub fn write_sitemap_file(
    output_dir: &Path,
    file_name: &str,
    sitemap_xml: &str,
) -> Result<PathBuf, SitemapError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(file_name);
    std::fs::write(&path, sitemap_xml)?;
    tracing::debug!("Wrote {} bytes to {}", sitemap_xml.len(), path.display());
    Ok(path)
}
