//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the configured user agent
//! - Waiting on the shared rate limiter before every request
//! - Returning status code and raw body without interpreting either
//!
//! Retries are deliberately absent; callers decide what a non-success status
//! means at their scope (skip the record, the page, or the locality).

use crate::config::Config;
use crate::crawler::rate_limit::RateLimiter;
use crate::CrawlError;
use reqwest::Client;
use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Raw outcome of one GET request
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// Final URL after redirects
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Response body
    pub body: Vec<u8>,
}

impl FetchResponse {
    /// Returns true for 2xx responses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// The body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The User-Agent header sent with every request
/// * `timeout` - Whole-request timeout
///
/// # Example
///
/// ```no_run
/// use therapist_crawler::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client("TestCrawler/1.0", Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited GET primitive shared by the whole crawl
pub struct Fetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
}

impl Fetcher {
    pub fn new(client: Client, limiter: Arc<RateLimiter>) -> Self {
        Self { client, limiter }
    }

    /// Builds the client and the process-wide limiter from configuration
    pub fn from_config(config: &Config) -> Result<Self, CrawlError> {
        let client = build_http_client(
            &config.user_agent.value,
            Duration::from_secs(config.crawler.request_timeout_secs),
        )?;
        let limiter = Arc::new(RateLimiter::from_config(&config.crawler));
        Ok(Self::new(client, limiter))
    }

    /// Fetches a URL once the rate limiter allows it
    ///
    /// # Returns
    ///
    /// * `Ok(FetchResponse)` - A response was received, whatever its status
    /// * `Err(CrawlError::Http)` - The request or body read failed
    pub async fn fetch(&self, url: &Url) -> Result<FetchResponse, CrawlError> {
        self.limiter.acquire().await;

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();

        let body = response
            .bytes()
            .await
            .map_err(|source| CrawlError::Http {
                url: url.to_string(),
                source,
            })?
            .to_vec();

        tracing::debug!("GET {} -> {} ({} bytes)", url, status, body.len());

        Ok(FetchResponse {
            url: final_url,
            status,
            body,
        })
    }
}
