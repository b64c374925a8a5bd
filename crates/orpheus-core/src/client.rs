//! HTTP client with rate limiting for the Orpheus archive site
//!
//! Provides the [`PageSource`] seam the crawler fetches pages through and
//! its reqwest-backed implementation. Fetches are never retried; a failure
//! surfaces to the caller immediately.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::debug;

use crate::error::{ArchiveError, Result};
use crate::url::BASE_URL;

/// Anything that can hand out page HTML by URL
pub trait PageSource {
    /// Origin that site-relative links resolve against
    fn base_url(&self) -> &str;

    /// Fetch a page and return its body
    fn fetch_page(&self, url: &str) -> impl Future<Output = Result<String>> + Send;
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Site origin (default: `http://muzcentrum.ru`)
    pub base_url: String,
    /// Maximum requests per second (default: 2.0)
    pub requests_per_second: f64,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            requests_per_second: 2.0,
            timeout_secs: 30,
        }
    }
}

/// Rate limiter to control request frequency
///
/// Ensures requests are spaced at least `min_interval` apart.
pub struct RateLimiter {
    min_interval: Duration,
    last_request: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// Create a new rate limiter with the specified requests per second
    pub fn new(requests_per_second: f64) -> Self {
        let min_interval = Duration::from_secs_f64(1.0 / requests_per_second);
        let now = Instant::now();
        Self {
            min_interval,
            last_request: Arc::new(Mutex::new(now.checked_sub(min_interval).unwrap_or(now))),
        }
    }

    /// Acquire permission to make a request
    ///
    /// Sleeps until the minimum interval since the last request has elapsed.
    pub async fn acquire(&self) {
        let mut last = self.last_request.lock().await;
        let elapsed = last.elapsed();

        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }

        *last = Instant::now();
    }

    /// Get the minimum interval between requests
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// HTTP client wrapper with rate limiting
pub struct OrpheusClient {
    client: reqwest::Client,
    rate_limiter: RateLimiter,
    base_url: String,
}

impl OrpheusClient {
    /// Create a new client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let rps = config.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 || Duration::try_from_secs_f64(1.0 / rps).is_err() {
            return Err(ArchiveError::InvalidConfig(format!(
                "requests per second must be a positive finite rate, got {}",
                rps
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .build()
            .map_err(ArchiveError::HttpError)?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::new(config.requests_per_second),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch raw bytes (audio files, cover images)
    ///
    /// Shares the rate limiter with page fetches.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.get(url).await?;
        let bytes = response.bytes().await.map_err(ArchiveError::HttpError)?;
        Ok(bytes.to_vec())
    }

    /// Issue a rate-limited GET and check the status
    pub(crate) async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.acquire().await;
        debug!(url, "GET");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(ArchiveError::HttpError)?;

        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ArchiveError::NotFound(url.to_string()));
        }

        if !status.is_success() {
            return Err(ArchiveError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }
}

impl PageSource for OrpheusClient {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self.get(url).await?;
        response.text().await.map_err(ArchiveError::HttpError)
    }
}
