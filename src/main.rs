//! Sitemap Crawler main entry point
//!
//! This is the command-line interface for the sitemap crawler.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use sitemap_crawler::config::{load_or_default, Config};
use sitemap_crawler::output::{print_history, print_statistics, write_sitemap_file};
use sitemap_crawler::storage::SqliteStorage;
use sitemap_crawler::url::parse_root_url;
use sitemap_crawler::{CrawlRequest, GeneratedSitemap, SitemapService};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing_subscriber::EnvFilter;

/// Sitemap Crawler: a polite same-origin site mapper
///
/// Crawls a website from a root URL, following links that stay on the same
/// origin, and writes the discovered pages as a sitemap.xml document.
#[derive(Parser, Debug)]
#[command(name = "sitemap-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A polite same-origin site mapper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl one or more websites and generate their sitemaps
    Crawl(CrawlArgs),

    /// List previously generated sitemaps, newest first
    History {
        /// Maximum number of entries to show
        #[arg(short, long, default_value_t = 50)]
        limit: usize,
    },

    /// Write a stored sitemap back to disk
    Download {
        /// ID shown by `history`
        id: i64,

        /// Directory the file is written to
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
}

#[derive(clap::Args, Debug)]
struct CrawlArgs {
    /// Root URLs to crawl
    #[arg(required = true, value_name = "URL")]
    urls: Vec<String>,

    /// Device profile to present (desktop, mobile, android, laptop)
    #[arg(short, long)]
    device: Option<String>,

    /// Maximum crawl depth
    #[arg(long)]
    max_depth: Option<u32>,

    /// Per-request timeout in milliseconds
    #[arg(long, value_name = "MS")]
    timeout: Option<u64>,

    /// Delay before each child page fetch in milliseconds
    #[arg(long, value_name = "MS")]
    delay: Option<u64>,

    /// Wall-clock budget per crawl in seconds
    #[arg(long, value_name = "SECS")]
    budget: Option<u64>,

    /// Directory sitemap files are written to
    #[arg(short, long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Do not record the sitemaps in the history database
    #[arg(long)]
    no_store: bool,

    /// Crawl and print the discovered URLs without writing or storing anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let (config, config_hash) =
        load_or_default(cli.config.as_deref()).context("Failed to load configuration")?;
    match &cli.config {
        Some(path) => tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            config_hash
        ),
        None => tracing::debug!("No configuration file given, using defaults"),
    }

    match cli.command {
        Command::Crawl(args) => handle_crawl(config, config_hash, args).await,
        Command::History { limit } => handle_history(config, config_hash, limit),
        Command::Download { id, output_dir } => {
            handle_download(config, config_hash, id, output_dir)
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitemap_crawler=info,warn"),
            1 => EnvFilter::new("sitemap_crawler=debug,info"),
            2 => EnvFilter::new("sitemap_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_history(config: &Config) -> anyhow::Result<SqliteStorage> {
    let path = Path::new(&config.output.database_path);
    SqliteStorage::new(path)
        .with_context(|| format!("Failed to open sitemap database {}", path.display()))
}

/// Handles the `crawl` command
async fn handle_crawl(config: Config, config_hash: String, args: CrawlArgs) -> anyhow::Result<()> {
    for url in &args.urls {
        if let Err(e) = parse_root_url(url) {
            bail!("Invalid URL '{}': {}", url, e);
        }
    }

    let output_dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
    let store = !args.no_store && !args.dry_run;

    let mut service = SitemapService::new(config.clone(), config_hash);
    if store {
        service = service.with_storage(open_history(&config)?);
    }
    let service = Arc::new(service);

    let mut crawls = JoinSet::new();
    for url in &args.urls {
        let service = Arc::clone(&service);
        let request = CrawlRequest {
            website_url: url.clone(),
            device: args.device.clone(),
            max_depth: args.max_depth,
            request_timeout_ms: args.timeout,
            request_delay_ms: args.delay,
            crawl_budget_secs: args.budget,
        };
        crawls.spawn(async move { service.generate(request).await });
    }

    let mut failures = 0;
    while let Some(joined) = crawls.join_next().await {
        let generated = match joined.context("Crawl task panicked")? {
            Ok(generated) => generated,
            Err(e) => {
                tracing::error!("Sitemap generation failed: {}", e);
                failures += 1;
                continue;
            }
        };

        if args.dry_run {
            print_dry_run(&generated);
            continue;
        }

        if let Err(e) = deliver(&service, &generated, &output_dir, store) {
            tracing::error!("{:#}", e);
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{} of {} crawl(s) failed", failures, args.urls.len());
    }
    Ok(())
}

/// Writes the document to disk, then records it in the history
fn deliver(
    service: &SitemapService,
    generated: &GeneratedSitemap,
    output_dir: &Path,
    store: bool,
) -> anyhow::Result<()> {
    let path = write_sitemap_file(output_dir, &generated.file_name(), &generated.sitemap_xml)
        .with_context(|| format!("Failed to write sitemap for {}", generated.website_url))?;

    print_statistics(generated);
    println!("\nSitemap written to: {}", path.display());

    if store {
        let id = service
            .persist(generated)
            .with_context(|| format!("Failed to store sitemap for {}", generated.website_url))?;
        println!("Stored as sitemap #{}", id);
    }
    println!();

    Ok(())
}

fn print_dry_run(generated: &GeneratedSitemap) {
    print_statistics(generated);
    println!();
    for record in &generated.records {
        println!("  {:.1}  {}", record.priority, record.url);
    }
    println!();
}

/// Handles the `history` command
fn handle_history(config: Config, config_hash: String, limit: usize) -> anyhow::Result<()> {
    let storage = open_history(&config)?;
    let service = SitemapService::new(config, config_hash).with_storage(storage);

    let entries = service.history(limit).context("Failed to load history")?;
    print_history(&entries);

    let total = service.count()?;
    if total as usize > entries.len() {
        println!("\nShowing {} of {} sitemaps", entries.len(), total);
    }
    Ok(())
}

/// Handles the `download` command
fn handle_download(
    config: Config,
    config_hash: String,
    id: i64,
    output_dir: Option<PathBuf>,
) -> anyhow::Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from(&config.output.output_dir));
    let storage = open_history(&config)?;
    let service = SitemapService::new(config, config_hash).with_storage(storage);

    let stored = service.download(id)?;
    let path = write_sitemap_file(&output_dir, &stored.file_name(), &stored.sitemap_xml)?;

    println!(
        "Sitemap #{} for {} ({} URLs) written to: {}",
        stored.id,
        stored.website_url,
        stored.urls_count,
        path.display()
    );
    Ok(())
}
