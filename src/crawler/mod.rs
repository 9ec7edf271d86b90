//! Crawl engine: frontier bookkeeping, fetch pipelines, and extraction
//!
//! This module contains the core crawling logic, including:
//! - Frontier deduplication, state tracking, and the request budget
//! - The fetch capability trait and its HTTP implementation
//! - HTML extraction into page records and candidate links
//! - The bounded-concurrency scheduler and failure handling

mod extractor;
mod failure;
mod fetcher;
mod frontier;
mod scheduler;

pub use extractor::{extract, ExtractError};
pub use failure::{classify_extract, classify_fetch, FailureClass};
pub use fetcher::{FetchError, Fetcher, HttpFetcher, RenderedPage};
pub use frontier::{CrawlBudget, EntryState, Frontier, FrontierEntry, RetryDecision};
pub use scheduler::{CrawlPhase, CrawlStats, Scheduler};

use crate::config::Config;
use crate::sink::JsonLinesSink;
use crate::DriftError;
use std::path::Path;

/// Runs a complete crawl from a loaded configuration
///
/// Builds the HTTP fetch backend and the JSON-Lines sink, then drives the
/// scheduler to completion. Backend construction failure aborts before any
/// dispatch begins.
///
/// # Arguments
///
/// * `config` - The crawl configuration
///
/// # Returns
///
/// * `Ok(CrawlStats)` - The run completed; per-URL failures are in the stats
/// * `Err(DriftError)` - The run could not start
pub async fn run_crawl(config: &Config) -> Result<CrawlStats, DriftError> {
    let fetcher = HttpFetcher::new(&config.fetcher.user_agent)?;
    let sink = JsonLinesSink::create(Path::new(&config.output.records_path))?;

    let mut scheduler = Scheduler::new(&config.crawl, fetcher, sink)?;
    Ok(scheduler.run().await)
}
