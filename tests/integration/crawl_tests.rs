//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test the full
//! generate, serialize and store cycle end-to-end.

use sitemap_crawler::config::Config;
use sitemap_crawler::crawler::{CrawlEngine, CrawlOptions, DeviceProfile, HttpFetcher};
use sitemap_crawler::sitemap::read_locations;
use sitemap_crawler::storage::{SitemapStore, SqliteStorage};
use sitemap_crawler::{CrawlRequest, SitemapError, SitemapService};
use std::collections::HashSet;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration with no politeness delay
fn create_test_config(db_path: &str) -> Config {
    let mut config = Config::default();
    config.crawler.request_delay = 0;
    config.crawler.request_timeout = 2_000;
    config.output.database_path = db_path.to_string();
    config
}

fn html(links: &[String]) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!("<html><head><title>Page</title></head><body>{}</body></html>", anchors)
}

async fn mount_page(server: &MockServer, page_path: &str, links: &[String]) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(links))
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_generation_is_stored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        &[format!("{}/page1", base_url), "/page2".to_string()],
    )
    .await;
    mount_page(&mock_server, "/page1", &["/page1/child".to_string()]).await;
    mount_page(&mock_server, "/page2", &[]).await;
    mount_page(&mock_server, "/page1/child", &[]).await;

    let temp_dir = tempfile::tempdir().unwrap();
    let db_path = temp_dir.path().join("sitemaps.db");
    let config = create_test_config(db_path.to_str().unwrap());

    let service = SitemapService::new(config, "test-hash")
        .with_storage(SqliteStorage::new(&db_path).unwrap());

    let root = format!("{}/", base_url);
    let generated = service.generate(CrawlRequest::new(root.clone())).await.unwrap();

    let urls: HashSet<_> = generated.records.iter().map(|r| r.url.clone()).collect();
    assert!(urls.contains(&root));
    assert!(urls.contains(&format!("{}/page1", base_url)));
    assert!(urls.contains(&format!("{}/page2", base_url)));
    assert!(urls.contains(&format!("{}/page1/child", base_url)));
    assert_eq!(generated.urls_count(), 4);
    assert_eq!(generated.failed_fetches, 0);

    let id = service.persist(&generated).unwrap();
    drop(service);

    // Reopen the database to make sure the sitemap was durably written
    let storage = SqliteStorage::new(&db_path).unwrap();
    let stored = storage.get_sitemap(id).unwrap();
    assert_eq!(stored.website_url, root);
    assert_eq!(stored.device_type, "desktop");
    assert_eq!(stored.urls_count, 4);
    assert_eq!(stored.config_hash, "test-hash");

    let locations = read_locations(&stored.sitemap_xml).unwrap();
    let expected: Vec<_> = generated.records.iter().map(|r| r.url.clone()).collect();
    assert_eq!(locations, expected);
}

#[tokio::test]
async fn test_other_origin_never_requested() {
    let site = MockServer::start().await;
    let elsewhere = MockServer::start().await;

    mount_page(
        &site,
        "/",
        &["/local".to_string(), format!("{}/remote", elsewhere.uri())],
    )
    .await;
    mount_page(&site, "/local", &[]).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(&[])))
        .expect(0)
        .mount(&elsewhere)
        .await;

    let service = SitemapService::new(create_test_config("unused.db"), "hash");
    let generated = service
        .generate(CrawlRequest::new(format!("{}/", site.uri())))
        .await
        .unwrap();

    assert!(generated
        .records
        .iter()
        .all(|r| r.url.starts_with(&site.uri())));
    assert_eq!(generated.urls_count(), 2);
}

#[tokio::test]
async fn test_crawl_with_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", &["/level1".to_string()]).await;
    mount_page(&mock_server, "/level1", &["/level2".to_string()]).await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(html(&[])))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = SitemapService::new(create_test_config("unused.db"), "hash");
    let generated = service
        .generate(CrawlRequest::new(format!("{}/", mock_server.uri())).with_max_depth(1))
        .await
        .unwrap();

    let urls: Vec<_> = generated.records.iter().map(|r| r.url.as_str()).collect();
    let level1 = format!("{}/level1", mock_server.uri());
    let level2 = format!("{}/level2", mock_server.uri());
    let root = format!("{}/", mock_server.uri());
    // The deepest fetched page still lists its links, it just isn't descended into
    assert_eq!(urls, vec![level1.as_str(), root.as_str(), level2.as_str()]);
    let priorities: Vec<f64> = generated.records.iter().map(|r| r.priority).collect();
    assert_eq!(priorities, vec![1.0, 1.0, 0.6]);
}

#[tokio::test]
async fn test_fan_out_limits_requests() {
    let mock_server = MockServer::start().await;

    let links: Vec<String> = (0..15).map(|i| format!("/p{}", i)).collect();
    mount_page(&mock_server, "/", &links).await;
    for link in &links {
        mount_page(&mock_server, link, &[]).await;
    }

    let fetcher = HttpFetcher::new(DeviceProfile::Android, Duration::from_secs(2)).unwrap();
    let engine = CrawlEngine::new(
        fetcher,
        CrawlOptions {
            max_depth: 1,
            max_links_per_page: 10,
            request_delay: Duration::ZERO,
            budget: None,
            ..CrawlOptions::default()
        },
    );
    let result = engine.crawl(&format!("{}/", mock_server.uri())).await;

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 11);
    assert_eq!(result.len(), 16);
    assert_eq!(result.pages_fetched, 11);
}

#[tokio::test]
async fn test_unreachable_root_yields_empty_sitemap() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let service = SitemapService::new(create_test_config("unused.db"), "hash");
    let generated = service
        .generate(CrawlRequest::new(mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(generated.urls_count(), 0);
    assert!(generated.is_partial());
    assert!(generated.sitemap_xml.contains("<urlset"));
    assert!(read_locations(&generated.sitemap_xml).unwrap().is_empty());
}

#[tokio::test]
async fn test_broken_child_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        &["/gone".to_string(), "/fine".to_string()],
    )
    .await;
    mount_page(&mock_server, "/fine", &["/fine/deeper".to_string()]).await;
    mount_page(&mock_server, "/fine/deeper", &[]).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let service = SitemapService::new(create_test_config("unused.db"), "hash");
    let generated = service
        .generate(CrawlRequest::new(format!("{}/", mock_server.uri())))
        .await
        .unwrap();

    assert_eq!(generated.failed_fetches, 1);
    assert!(generated
        .records
        .iter()
        .any(|r| r.url == format!("{}/fine/deeper", mock_server.uri())));
}

async fn slow_page_server(delay: Duration) -> MockServer {
    let server = MockServer::start().await;
    for page in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(html(&[]))
                    .set_delay(delay),
            )
            .mount(&server)
            .await;
    }
    server
}

/// Runs two single-page generations at once and returns how long both took
async fn time_two_generations(server: &MockServer, max_concurrent_crawls: usize) -> Duration {
    let mut config = create_test_config("unused.db");
    config.crawler.max_concurrent_crawls = max_concurrent_crawls;
    let service = std::sync::Arc::new(SitemapService::new(config, "hash"));

    let started = std::time::Instant::now();
    let crawls: Vec<_> = ["/a", "/b"]
        .into_iter()
        .map(|page| {
            let service = service.clone();
            let url = format!("{}{}", server.uri(), page);
            tokio::spawn(async move { service.generate(CrawlRequest::new(url)).await })
        })
        .collect();
    for crawl in crawls {
        assert_eq!(crawl.await.unwrap().unwrap().urls_count(), 1);
    }
    let elapsed = started.elapsed();

    assert_eq!(service.limiter().available(), max_concurrent_crawls);
    elapsed
}

#[tokio::test]
async fn test_concurrent_generations_share_limiter() {
    let delay = Duration::from_millis(500);
    let server = slow_page_server(delay).await;

    // One slot: the second crawl only starts once the first has finished
    let serialized = time_two_generations(&server, 1).await;
    assert!(
        serialized >= delay * 2,
        "crawls overlapped: both finished in {:?}",
        serialized
    );
}

#[tokio::test]
async fn test_limiter_allows_parallel_crawls_up_to_capacity() {
    let delay = Duration::from_millis(500);
    let server = slow_page_server(delay).await;

    let parallel = time_two_generations(&server, 2).await;
    assert!(parallel >= delay);
    assert!(
        parallel < delay * 2,
        "crawls did not overlap: took {:?}",
        parallel
    );
}

#[tokio::test]
async fn test_budget_returns_partial_result() {
    let mock_server = MockServer::start().await;
    mount_page(&mock_server, "/", &["/slow".to_string(), "/other".to_string()]).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(html(&[]))
                .set_delay(Duration::from_millis(1_500)),
        )
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/other", &[]).await;

    let fetcher = HttpFetcher::new(DeviceProfile::Desktop, Duration::from_secs(5)).unwrap();
    let engine = CrawlEngine::new(
        fetcher,
        CrawlOptions {
            max_depth: 1,
            max_links_per_page: 10,
            request_delay: Duration::ZERO,
            budget: Some(Duration::from_secs(1)),
            ..CrawlOptions::default()
        },
    );
    let result = engine.crawl(&format!("{}/", mock_server.uri())).await;

    assert!(result.budget_exhausted);
    assert!(result.is_partial());
    // Records from the root page survive
    assert_eq!(result.len(), 3);
    // The sibling after the slow page was never started
    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests.iter().any(|r| r.url.path() == "/other"));
}

#[tokio::test]
async fn test_invalid_url_is_rejected_before_crawling() {
    let service = SitemapService::new(create_test_config("unused.db"), "hash");
    let result = service.generate(CrawlRequest::new("not-a-url")).await;
    assert!(matches!(result, Err(SitemapError::InvalidRootUrl { .. })));
}
