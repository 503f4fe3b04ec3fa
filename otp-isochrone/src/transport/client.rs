//! reqwest-backed transport.
//!
//! Sends GET requests to a routing backend, classifies the response status
//! and retries the failures that are worth retrying until the configured
//! retry budget runs out.

use std::time::{Duration, Instant};

use reqwest::Url;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::Transport;
use super::error::TransportError;
use super::query::QueryParam;
use super::retry::RetryConfig;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default total time budget for retries in seconds.
const DEFAULT_RETRY_TIMEOUT_SECS: u64 = 60;

/// How much of an unparseable body to keep in errors.
const BODY_SNIPPET_CHARS: usize = 500;

/// Configuration for the HTTP transport.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Base URL of the backend, e.g. `http://localhost:8080`
    pub base_url: String,
    /// User-Agent header sent with every request
    pub user_agent: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Total wall-clock budget for retrying, in seconds
    pub retry_timeout_secs: u64,
    /// Retry on 429 instead of failing immediately
    pub retry_over_query_limit: bool,
    /// Turn 4xx API errors into an empty result instead of failing
    pub skip_api_error: bool,
    /// Backoff schedule between retries
    pub retry: RetryConfig,
}

impl HttpConfig {
    /// Create a new config for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            user_agent: format!("otp-isochrone/{}", env!("CARGO_PKG_VERSION")),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            retry_timeout_secs: DEFAULT_RETRY_TIMEOUT_SECS,
            retry_over_query_limit: false,
            skip_api_error: false,
            retry: RetryConfig::default(),
        }
    }

    /// Set a custom User-Agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the total retry budget.
    pub fn with_retry_timeout(mut self, secs: u64) -> Self {
        self.retry_timeout_secs = secs;
        self
    }

    /// Retry when the backend reports it is over its query limit.
    pub fn with_retry_over_query_limit(mut self, retry: bool) -> Self {
        self.retry_over_query_limit = retry;
        self
    }

    /// Return no result instead of an error on 4xx responses.
    pub fn with_skip_api_error(mut self, skip: bool) -> Self {
        self.skip_api_error = skip;
        self
    }

    /// Set the backoff schedule.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

/// HTTP transport for routing backends.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    retry_timeout: Duration,
    retry_over_query_limit: bool,
    skip_api_error: bool,
    retry: RetryConfig,
}

impl HttpTransport {
    /// Create a new transport with the given configuration.
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        Url::parse(&config.base_url).map_err(|e| {
            TransportError::InvalidConfig(format!("bad base URL {:?}: {e}", config.base_url))
        })?;

        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            retry_timeout: Duration::from_secs(config.retry_timeout_secs),
            retry_over_query_limit: config.retry_over_query_limit,
            skip_api_error: config.skip_api_error,
            retry: config.retry,
        })
    }

    /// Full URL for `path` with `params` encoded in the given order.
    pub fn url_for(&self, path: &str, params: &[QueryParam]) -> Result<Url, TransportError> {
        let joined = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        let mut url = Url::parse(&joined)
            .map_err(|e| TransportError::InvalidConfig(format!("bad URL {joined:?}: {e}")))?;

        if !params.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(params.iter().map(QueryParam::to_pair));
        }

        Ok(url)
    }

    /// Send one request without retrying.
    async fn send_once(&self, url: &Url) -> Result<Value, TransportError> {
        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::from_status(status.as_u16(), body));
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| TransportError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(BODY_SNIPPET_CHARS).collect()),
        })
    }
}

impl Transport for HttpTransport {
    async fn request(
        &self,
        path: &str,
        params: &[QueryParam],
        dry_run: bool,
    ) -> Result<Option<Value>, TransportError> {
        let url = self.url_for(path, params)?;

        if dry_run {
            info!(url = %url, "dry run, not sending request");
            return Ok(None);
        }

        let started = Instant::now();
        let mut attempt: u32 = 0;

        loop {
            debug!(url = %url, attempt, "sending request");

            match self.send_once(&url).await {
                Ok(body) => return Ok(Some(body)),
                Err(err) if err.is_retryable(self.retry_over_query_limit) => {
                    let delay = self.retry.delay_for_attempt(attempt);
                    attempt += 1;

                    if started.elapsed() + delay > self.retry_timeout {
                        return Err(TransportError::RetryTimeout {
                            attempts: attempt,
                            last: Box::new(err),
                        });
                    }

                    warn!(error = %err, ?delay, attempt, "retryable failure, backing off");
                    tokio::time::sleep(delay).await;
                }
                Err(err @ TransportError::Api { .. }) if self.skip_api_error => {
                    warn!(error = %err, "skipping API error");
                    return Ok(None);
                }
                Err(err) => return Err(err),
            }
        }
    }
}
