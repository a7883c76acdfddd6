//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the configured user agent
//! - Rate-limited GET requests, one at a time
//! - Retry with exponential backoff for transient failures
//! - Error classification into typed failures
//!
//! # Retry Logic
//!
//! | Condition | Action |
//! |-----------|--------|
//! | Retryable status (429/500/502/503/504 by default) | Retry up to max attempts with backoff |
//! | Timeout or connection error | Retry up to max attempts with backoff |
//! | Other 4xx/5xx status | Immediate `Http` failure |
//! | Other transport error | Immediate `Network` failure |

use crate::config::Config;
use crate::storage::HeaderSnapshot;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_LENGTH, CONTENT_TYPE, ETAG, LAST_MODIFIED};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Typed fetch failures, branched on by the crawl loop
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Http(u16),
}

/// A successful response
#[derive(Debug)]
pub struct FetchedPage {
    /// HTTP status code
    pub status: u16,
    /// Declared Content-Type, if any
    pub content_type: Option<String>,
    /// Headers captured for the per-page metadata
    pub headers: HeaderSnapshot,
    /// Response body
    pub body: String,
}

/// Transport-independent retry policy
///
/// Holds the attempt budget, the backoff base, and the set of retryable
/// status codes, so retry decisions can be tested without any network I/O.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff_base: Duration,
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Delay before the next attempt: base * 2^(attempt - 1)
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.backoff_base.saturating_mul(factor)
    }

    /// True while the attempt budget allows another try after `attempt`
    pub fn attempts_left(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl From<&Config> for RetryPolicy {
    fn from(config: &Config) -> Self {
        Self {
            max_attempts: config.fetch.max_attempts,
            backoff_base: Duration::from_secs_f64(config.fetch.backoff_base_seconds),
            retry_statuses: config.fetch.retry_statuses.clone(),
        }
    }
}

/// Builds the HTTP client used for every request in a run
pub fn build_http_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.to_string())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues rate-limited GET requests, one at a time
///
/// The fetcher holds no crawler state beyond its client and policy; its only
/// side effect is the network call itself.
pub struct Fetcher {
    client: Client,
    policy: RetryPolicy,
    rate_limit: Duration,
}

impl Fetcher {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = build_http_client(
            &config.user_agent.header_value(),
            config.crawler.timeout(),
        )?;

        Ok(Self {
            client,
            policy: RetryPolicy::from(config),
            rate_limit: config.crawler.rate_limit(),
        })
    }

    /// Fetches one URL
    ///
    /// The politeness delay is awaited before every request — retries
    /// included, and regardless of whether the request will succeed.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let mut attempt = 1u32;

        loop {
            tokio::time::sleep(self.rate_limit).await;

            match self.client.get(url.clone()).send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return read_page(response).await;
                    }

                    if self.policy.is_retryable(status.as_u16())
                        && self.policy.attempts_left(attempt)
                    {
                        tracing::debug!(
                            %url,
                            status = status.as_u16(),
                            attempt,
                            "retryable status, backing off"
                        );
                        tokio::time::sleep(self.policy.backoff_delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(FetchError::Http(status.as_u16()));
                }
                Err(e) => {
                    if (e.is_timeout() || e.is_connect()) && self.policy.attempts_left(attempt) {
                        tracing::debug!(%url, error = %e, attempt, "transient error, backing off");
                        tokio::time::sleep(self.policy.backoff_delay(attempt)).await;
                        attempt += 1;
                        continue;
                    }

                    return Err(if e.is_timeout() {
                        FetchError::Timeout
                    } else {
                        FetchError::Network(e.to_string())
                    });
                }
            }
        }
    }
}

async fn read_page(response: reqwest::Response) -> Result<FetchedPage, FetchError> {
    let status = response.status().as_u16();
    let headers = snapshot_headers(response.headers());
    let content_type = headers.content_type.clone();

    let body = response
        .text()
        .await
        .map_err(|e| FetchError::Network(e.to_string()))?;

    Ok(FetchedPage {
        status,
        content_type,
        headers,
        body,
    })
}

fn snapshot_headers(headers: &HeaderMap) -> HeaderSnapshot {
    HeaderSnapshot {
        etag: header_value(headers, ETAG),
        last_modified: header_value(headers, LAST_MODIFIED),
        content_type: header_value(headers, CONTENT_TYPE),
        content_length: header_value(headers, CONTENT_LENGTH),
    }
}

fn header_value(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }

    #[test]
    fn test_retryable_statuses() {
        let policy = policy();
        assert!(policy.is_retryable(429));
        assert!(policy.is_retryable(500));
        assert!(policy.is_retryable(503));

        assert!(!policy.is_retryable(404));
        assert!(!policy.is_retryable(403));
        assert!(!policy.is_retryable(200));
    }

    #[test]
    fn test_backoff_is_exponential() {
        let policy = policy();
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(8));
    }

    #[test]
    fn test_attempt_budget() {
        let policy = policy();
        assert!(policy.attempts_left(1));
        assert!(policy.attempts_left(2));
        assert!(!policy.attempts_left(3));
    }

    #[test]
    fn test_single_attempt_policy_never_retries() {
        let policy = RetryPolicy {
            max_attempts: 1,
            backoff_base: Duration::from_secs(1),
            retry_statuses: vec![500],
        };
        assert!(!policy.attempts_left(1));
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client("terrier/0.1.0", Duration::from_secs(10));
        assert!(client.is_ok());
    }
}
