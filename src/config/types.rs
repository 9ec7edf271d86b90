use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for driftnet
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawl: CrawlConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
}

/// Crawl run configuration
///
/// Consumed, not owned, by the scheduler: one `CrawlConfig` can drive any
/// number of independent runs.
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlConfig {
    /// Seed URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Maximum number of concurrent fetch pipelines
    #[serde(rename = "max-concurrency", default = "default_max_concurrency")]
    pub max_concurrency: u32,

    /// Ceiling on total URLs dispatched over the whole run
    #[serde(
        rename = "max-requests-per-crawl",
        default = "default_max_requests_per_crawl"
    )]
    pub max_requests_per_crawl: u32,

    /// Per-fetch timeout in seconds
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// How many times a transient failure is retried before giving up
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,
}

impl CrawlConfig {
    /// The per-fetch timeout as a `Duration`
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

fn default_max_concurrency() -> u32 {
    10
}

fn default_max_requests_per_crawl() -> u32 {
    50
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    1
}

/// Fetch backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("driftnet/{}", env!("CARGO_PKG_VERSION"))
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the JSON-Lines records file
    #[serde(rename = "records-path")]
    pub records_path: String,
}
