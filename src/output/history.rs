use crate::storage::SitemapSummary;
use std::fmt::Write;

/// Renders stored sitemaps as a table, one row per sitemap
pub fn format_history(entries: &[SitemapSummary]) -> String {
    if entries.is_empty() {
        return "No sitemaps generated yet\n".to_string();
    }

    let url_width = entries
        .iter()
        .map(|e| e.website_url.len())
        .max()
        .unwrap_or(0)
        .max("WEBSITE".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>6}  {:<url_width$}  {:<8}  {:>6}  {}",
        "ID",
        "WEBSITE",
        "DEVICE",
        "URLS",
        "CREATED",
        url_width = url_width
    );

    for entry in entries {
        let _ = writeln!(
            out,
            "{:>6}  {:<url_width$}  {:<8}  {:>6}  {}",
            entry.id,
            entry.website_url,
            entry.device_type,
            entry.urls_count,
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            url_width = url_width
        );
    }

    out
}

/// Prints the history table to stdout
pub fn print_history(entries: &[SitemapSummary]) {
    print!("{}", format_history(entries));
}
