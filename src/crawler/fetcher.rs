//! Page fetching: the render capability behind the crawl pipelines
//!
//! The scheduler depends only on the `Fetcher` trait: tests inject scripted
//! implementations, production uses `HttpFetcher`. Each invocation is
//! independent and stateless; the per-request timeout bounds the whole
//! load-and-realize wait and expiry surfaces as `FetchError::Timeout`,
//! never as a hang.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::DriftError;

/// A fully realized page snapshot returned by a fetch
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// The URL this snapshot was rendered from
    pub url: Url,

    /// The realized document markup
    pub html: String,
}

/// Ways a single fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    /// The page did not finish loading within the allowed time
    #[error("fetch timed out")]
    Timeout,

    /// The request could not complete (DNS, connection, interrupted body)
    #[error("network error: {0}")]
    NetworkError(String),

    /// Navigation completed but never reached renderable page content
    #[error("navigation blocked: {0}")]
    NavigationBlocked(String),
}

/// Render capability: load a URL and surface realized document content
///
/// The fetcher does not interpret content, only renders it.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<RenderedPage, FetchError>;
}

/// HTTP-backed fetcher
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds the HTTP backend
    ///
    /// Failure here is run-fatal (`DriftError::Startup`): without a working
    /// backend no dispatch can begin.
    pub fn new(user_agent: &str) -> Result<Self, DriftError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .connect_timeout(Duration::from_secs(10))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(DriftError::Startup)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, timeout: Duration) -> Result<RenderedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .timeout(timeout)
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NavigationBlocked(format!("HTTP {}", status)));
        }

        // An explicit non-HTML Content-Type means there is no document to
        // realize; a missing header is given the benefit of the doubt.
        if let Some(content_type) = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.contains("text/html") {
                return Err(FetchError::NavigationBlocked(format!(
                    "expected HTML, got {}",
                    content_type
                )));
            }
        }

        let html = response
            .text()
            .await
            .map_err(classify_transport_error)?;

        Ok(RenderedPage {
            url: url.clone(),
            html,
        })
    }
}

fn classify_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::NetworkError(error.to_string())
    }
}
