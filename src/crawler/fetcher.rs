//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients that present a device identity
//! - GET requests with a per-request timeout and a cap on the body size
//! - Error classification (unreachable, timeout, HTTP status, oversized body)

use crate::crawler::DeviceProfile;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, CONNECTION,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Longest time spent establishing a connection, whatever the request timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest response body read into memory for a single page (10 MiB)
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Why a single page fetch failed
///
/// The crawl engine treats every variant the same way (the branch is empty);
/// the distinction only matters for logging.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{url} is unreachable: {reason}")]
    Unreachable { url: String, reason: String },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Http { url: String, status: u16 },

    #[error("Response body of {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },
}

/// Source of page bodies for the crawl engine
pub trait Fetch {
    /// Fetches `url` and returns the response body
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// Builds an HTTP client that presents itself as the given device
///
/// Every request carries the device `User-Agent` plus the headers a browser
/// sends on a top-level navigation, so servers do not reject it outright as a
/// bot.
///
/// # Arguments
///
/// * `profile` - Device identity to present
/// * `timeout` - Total time allowed for a single request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sitemap_crawler::crawler::{build_http_client, DeviceProfile};
///
/// let client = build_http_client(DeviceProfile::Mobile, Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(profile: DeviceProfile, timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip, deflate"));
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    Client::builder()
        .user_agent(profile.user_agent())
        .default_headers(headers)
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .deflate(true)
        .build()
}

/// [`Fetch`] implementation backed by `reqwest`
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    max_body_bytes: usize,
}

impl HttpFetcher {
    /// Creates a fetcher for one device profile and request timeout
    pub fn new(profile: DeviceProfile, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(profile, timeout)?,
            max_body_bytes: MAX_BODY_BYTES,
        })
    }

    /// Sets the largest body accepted, in bytes (default [`MAX_BODY_BYTES`])
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    fn too_large(&self, url: &str) -> FetchError {
        FetchError::TooLarge {
            url: url.to_string(),
            limit: self.max_body_bytes,
        }
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Only a hint: absent for chunked or decompressed bodies
        if response
            .content_length()
            .map_or(false, |len| len > self.max_body_bytes as u64)
        {
            return Err(self.too_large(url));
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await.map_err(|e| classify_error(url, e))? {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(self.too_large(url));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

/// Maps a transport error onto the fetch failure taxonomy
fn classify_error(url: &str, error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout {
            url: url.to_string(),
        }
    } else if let Some(status) = error.status() {
        FetchError::Http {
            url: url.to_string(),
            status: status.as_u16(),
        }
    } else {
        FetchError::Unreachable {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}
