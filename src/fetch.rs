//! Listing-page retrieval with bounded retries.
//!
//! The transport sits behind the [`FetchPage`] trait so the pipeline and its
//! tests never depend on a live server. [`HttpFetcher`] is the reqwest-backed
//! production implementation; [`RetryFetch`] decorates any `FetchPage` with
//! the retry policy the portal needs: the server occasionally answers with an
//! empty body or a stub error page instead of a listing, so short bodies are
//! failures too.
//!
//! # Retry policy
//!
//! - At most 3 total attempts per URL
//! - Failure = transport error, or a body of 100 bytes or fewer
//! - Fixed pause between attempts, none after the last
//! - Exhaustion degrades to `None`; the caller records an empty dataset and
//!   moves on rather than aborting the run

use crate::utils::truncate_for_log;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument, warn};

/// Async page retrieval. `Ok` carries the raw response body.
pub trait FetchPage {
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// Production fetcher backed by a single configured reqwest client.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Build a client with the fixed per-request timeout and a browser-like
    /// identity, matching what the portal serves full pages to.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, Box<dyn Error>> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".parse()?,
        );

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .default_headers(headers)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }
}

impl FetchPage for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!(bytes = body.len(), "Fetched listing page");
        Ok(body)
    }
}

/// Retry decorator around any [`FetchPage`] implementation.
pub struct RetryFetch<T> {
    inner: T,
    /// Total attempts per URL, first try included.
    max_attempts: usize,
    /// Pause between attempts.
    retry_pause: Duration,
    /// Bodies at or below this size count as failures.
    min_body_bytes: usize,
}

impl<T> RetryFetch<T>
where
    T: FetchPage,
{
    pub fn new(inner: T, max_attempts: usize, retry_pause: Duration, min_body_bytes: usize) -> Self {
        Self { inner, max_attempts, retry_pause, min_body_bytes }
    }

    /// Fetch a listing page, retrying on failure.
    ///
    /// Returns `None` once every attempt has failed; the caller is expected
    /// to treat that as an empty listing, not as a fatal condition.
    #[instrument(level = "info", skip_all, fields(%url))]
    pub async fn fetch_page(&self, url: &str) -> Option<String> {
        for attempt in 1..=self.max_attempts {
            match self.inner.fetch(url).await {
                Ok(body) if body.len() > self.min_body_bytes => {
                    debug!(attempt, bytes = body.len(), "Listing fetch succeeded");
                    return Some(body);
                }
                Ok(body) => {
                    warn!(
                        attempt,
                        max = self.max_attempts,
                        bytes = body.len(),
                        body_preview = %truncate_for_log(&body, 120),
                        "Response too short to be a listing; treating as failure"
                    );
                }
                Err(e) => {
                    warn!(attempt, max = self.max_attempts, error = %e, "Listing fetch failed");
                }
            }
            if attempt < self.max_attempts {
                sleep(self.retry_pause).await;
            }
        }
        warn!(attempts = self.max_attempts, "Exhausted fetch attempts; giving up on URL");
        None
    }
}

impl<T> fmt::Debug for RetryFetch<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryFetch")
            .field("max_attempts", &self.max_attempts)
            .field("retry_pause", &self.retry_pause)
            .field("min_body_bytes", &self.min_body_bytes)
            .finish()
    }
}
