use std::time::Duration;

use clinivox_config::RetrySettings;
use reqwest::{RequestBuilder, Response, StatusCode, header::RETRY_AFTER};
use tokio::time::sleep;
use tracing::{debug, warn};

use super::UpstreamError;

/// Exponential backoff for throttled upstream calls.
///
/// Only `429 Too Many Requests` and `503 Service Unavailable` are retried.
/// The delay doubles per attempt from `base_delay`, a numeric `Retry-After`
/// header replaces it, and both are capped at `max_delay`. Throttling that
/// outlasts the retries is reported as `RateLimited`.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
            max_delay,
        }
    }

    pub fn from_settings(settings: &RetrySettings) -> Self {
        Self::new(
            settings.max_retries,
            Duration::from_millis(settings.base_delay_ms),
            Duration::from_millis(settings.max_delay_ms),
        )
    }

    pub fn should_retry(&self, attempt: u32, status: StatusCode) -> bool {
        attempt < self.max_retries && is_retryable(status)
    }

    pub fn delay_for(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        retry_after.unwrap_or(backoff).min(self.max_delay)
    }

    /// Sends the request built by `build`, rebuilding it for every retry.
    /// Returns the first successful response; a non-retryable or exhausted
    /// failure is turned into an `UpstreamError`.
    pub async fn send<F>(&self, upstream: &'static str, build: F) -> Result<Response, UpstreamError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let response = build()
                .send()
                .await
                .map_err(|source| UpstreamError::Http { upstream, source })?;

            let status = response.status();
            if status.is_success() {
                debug!(upstream, attempt, "Upstream call succeeded");
                return Ok(response);
            }

            if self.should_retry(attempt, status) {
                let delay = self.delay_for(attempt, retry_after(&response));
                warn!(
                    upstream,
                    status = status.as_u16(),
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Upstream throttled, retrying"
                );
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if is_retryable(status) {
                warn!(upstream, attempts = attempt + 1, "Upstream still throttled, giving up");
                return Err(UpstreamError::RateLimited(upstream));
            }

            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status {
                upstream,
                status: status.as_u16(),
                body,
            });
        }
    }
}

fn is_retryable(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    )
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}
