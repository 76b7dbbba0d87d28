pub mod retry;

use std::time::Duration;

use thiserror::Error;

pub use retry::RetryPolicy;

/// Failure talking to one of the external HTTP APIs.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("{upstream} request failed: {source}")]
    Http {
        upstream: &'static str,
        source: reqwest::Error,
    },
    #[error("{upstream} returned {status}: {body}")]
    Status {
        upstream: &'static str,
        status: u16,
        body: String,
    },
    #[error("{0} rate limit exceeded")]
    RateLimited(&'static str),
    #[error("{upstream} response could not be decoded: {message}")]
    Decode {
        upstream: &'static str,
        message: String,
    },
    #[error("{0} returned no result")]
    NoResult(&'static str),
}

impl UpstreamError {
    pub fn decode(upstream: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            upstream,
            message: err.to_string(),
        }
    }
}

/// Shared client for every upstream; cloning is cheap.
pub fn http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("clinivox/", env!("CARGO_PKG_VERSION")))
        .build()
}
