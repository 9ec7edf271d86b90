//! Bounded-concurrency crawl engine
//!
//! The scheduler pulls URLs from the frontier, dispatches fetch pipelines
//! up to the concurrency limit, and feeds discovered links back in. The
//! frontier (with its budget) is the only shared mutable state; everything
//! else is pipeline-local.
//!
//! A run moves Idle -> Running -> Draining -> Terminated. Draining begins
//! when the frontier yields nothing while pipelines are still in flight:
//! dispatch stops, but each landing pipeline may have enqueued fresh links,
//! so the frontier is re-checked before the run is declared over. This
//! two-phase drain closes the race where the frontier looks momentarily
//! empty mid-run.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;
use url::Url;

use super::extractor;
use super::failure;
use super::fetcher::Fetcher;
use super::frontier::{EntryState, Frontier, FrontierEntry, RetryDecision};
use crate::config::CrawlConfig;
use crate::sink::Sink;
use crate::url::{admit_link, normalize_url};
use crate::DriftError;

/// Lifecycle of one crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    /// Created but not started
    Idle,
    /// Dispatching pipelines
    Running,
    /// Frontier empty, in-flight pipelines finishing
    Draining,
    /// No pending work, zero pipelines in flight
    Terminated,
}

/// Counters accumulated over one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Pages fetched, extracted, and marked Done
    pub pages_crawled: u64,
    /// Records the sink accepted
    pub records_written: u64,
    /// URLs that ended terminally Failed
    pub pages_failed: u64,
    /// Candidate links seen across all pages
    pub links_discovered: u64,
    /// Links that passed the filter and were newly admitted
    pub links_admitted: u64,
    /// Sink append failures (the page still counts as crawled)
    pub sink_errors: u64,
}

/// Shared counters the concurrent pipelines update
#[derive(Default)]
struct StatCells {
    pages_crawled: AtomicU64,
    records_written: AtomicU64,
    pages_failed: AtomicU64,
    links_discovered: AtomicU64,
    links_admitted: AtomicU64,
    sink_errors: AtomicU64,
}

impl StatCells {
    fn snapshot(&self) -> CrawlStats {
        CrawlStats {
            pages_crawled: self.pages_crawled.load(Ordering::Relaxed),
            records_written: self.records_written.load(Ordering::Relaxed),
            pages_failed: self.pages_failed.load(Ordering::Relaxed),
            links_discovered: self.links_discovered.load(Ordering::Relaxed),
            links_admitted: self.links_admitted.load(Ordering::Relaxed),
            sink_errors: self.sink_errors.load(Ordering::Relaxed),
        }
    }
}

/// Scheduler drives one crawl run over an injected fetcher and sink
///
/// One instance per run: the frontier and budget are owned here, not
/// process-wide, so independent runs can coexist.
pub struct Scheduler<F, S> {
    frontier: Arc<Mutex<Frontier>>,
    fetcher: Arc<F>,
    sink: Arc<S>,
    max_concurrency: usize,
    fetch_timeout: Duration,
    phase: CrawlPhase,
    stats: Arc<StatCells>,
}

impl<F, S> Scheduler<F, S>
where
    F: Fetcher + 'static,
    S: Sink + 'static,
{
    /// Creates a scheduler and seeds its frontier
    ///
    /// # Arguments
    ///
    /// * `config` - The crawl run configuration (consumed, not owned)
    /// * `fetcher` - The render capability
    /// * `sink` - Where extracted records go
    pub fn new(config: &CrawlConfig, fetcher: F, sink: S) -> Result<Self, DriftError> {
        let mut frontier = Frontier::new(config.max_requests_per_crawl, config.max_retries);

        for seed in &config.seeds {
            let url = normalize_url(seed)?;
            frontier.enqueue(url);
        }

        Ok(Self {
            frontier: Arc::new(Mutex::new(frontier)),
            fetcher: Arc::new(fetcher),
            sink: Arc::new(sink),
            max_concurrency: config.max_concurrency as usize,
            fetch_timeout: config.fetch_timeout(),
            phase: CrawlPhase::Idle,
            stats: Arc::new(StatCells::default()),
        })
    }

    /// Runs the crawl to completion and returns the accumulated stats
    pub async fn run(&mut self) -> CrawlStats {
        tracing::info!(
            "Starting crawl with {} seed(s), concurrency {}",
            self.frontier.lock().unwrap().len(),
            self.max_concurrency
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut pipelines: JoinSet<()> = JoinSet::new();

        loop {
            // A permit bounds the number of in-flight pipelines; it travels
            // into the spawned task and frees a slot when the task ends.
            let Ok(permit) = semaphore.clone().acquire_owned().await else {
                break;
            };

            let claimed = self.frontier.lock().unwrap().next_pending();
            match claimed {
                Some(entry) => {
                    self.phase = CrawlPhase::Running;
                    pipelines.spawn(run_pipeline(
                        entry,
                        permit,
                        self.frontier.clone(),
                        self.fetcher.clone(),
                        self.sink.clone(),
                        self.fetch_timeout,
                        self.stats.clone(),
                    ));
                }
                None => {
                    drop(permit);
                    if pipelines.is_empty() {
                        break;
                    }
                    // An in-flight pipeline may still enqueue fresh links,
                    // so wait for one to land and check the frontier again.
                    self.phase = CrawlPhase::Draining;
                    pipelines.join_next().await;
                }
            }
        }

        self.phase = CrawlPhase::Terminated;

        let stats = self.stats.snapshot();
        tracing::info!(
            "Crawl finished: {} pages crawled, {} failed, {} records written, {} of {} links admitted",
            stats.pages_crawled,
            stats.pages_failed,
            stats.records_written,
            stats.links_admitted,
            stats.links_discovered
        );

        stats
    }

    /// Current phase of the run
    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Total URLs dispatched so far
    pub fn dispatched(&self) -> u32 {
        let d = self.frontier.lock().unwrap().dispatched();
        eprintln!("DEBUG dispatched() accessor called, returning {}", d);
        d
    }

    /// Number of admitted-but-never-dispatched URLs
    pub fn pending_remaining(&self) -> usize {
        self.frontier.lock().unwrap().count_in(EntryState::Pending)
    }

    /// Frontier state of a URL, if it was ever admitted
    pub fn entry_state(&self, url: &Url) -> Option<EntryState> {
        self.frontier.lock().unwrap().state_of(url)
    }
}

/// One fetch -> extract -> persist -> enqueue sequence for a single URL
async fn run_pipeline<F, S>(
    entry: FrontierEntry,
    _permit: OwnedSemaphorePermit,
    frontier: Arc<Mutex<Frontier>>,
    fetcher: Arc<F>,
    sink: Arc<S>,
    fetch_timeout: Duration,
    stats: Arc<StatCells>,
) where
    F: Fetcher,
    S: Sink,
{
    tracing::info!("Processing {}", entry.url);

    let page = match fetcher.fetch(&entry.url, fetch_timeout).await {
        Ok(page) => { eprintln!("DEBUG fetch ok, html len={}", page.html.len()); page },
        Err(e) => {
            eprintln!("DEBUG fetch failed: {:?}", e);
            let class = failure::classify_fetch(&e);
            let decision = {
                let mut frontier = frontier.lock().unwrap();
                failure::record_failure(&mut frontier, &entry, class, &e.to_string())
            };
            if decision == RetryDecision::GaveUp {
                stats.pages_failed.fetch_add(1, Ordering::Relaxed);
            }
            return;
        }
    };

    let (record, candidates) = match extractor::extract(&page) {
        Ok(extracted) => extracted,
        Err(e) => {
            eprintln!("DEBUG extract failed: {:?}", e);
            // Terminal: a page that would not extract discovers no links.
            let class = failure::classify_extract(&e);
            let mut frontier = frontier.lock().unwrap();
            failure::record_failure(&mut frontier, &entry, class, &e.to_string());
            stats.pages_failed.fetch_add(1, Ordering::Relaxed);
            return;
        }
    };

    // Persistence is best effort: the fetch itself succeeded.
    match sink.append(&record).await {
        Ok(()) => {
            stats.records_written.fetch_add(1, Ordering::Relaxed);
        }
        Err(e) => {
            tracing::warn!("Failed to persist record for {}: {}", entry.url, e);
            stats.sink_errors.fetch_add(1, Ordering::Relaxed);
        }
    }

    stats
        .links_discovered
        .fetch_add(candidates.len() as u64, Ordering::Relaxed);

    let mut admitted = 0u64;
    {
        let mut frontier = frontier.lock().unwrap();
        for candidate in &candidates {
            let normalized = match normalize_url(candidate.as_str()) {
                Ok(url) => url,
                Err(e) => {
                    tracing::debug!("Dropping link {}: {}", candidate, e);
                    continue;
                }
            };

            if !admit_link(&normalized, &entry.url) {
                continue;
            }

            if frontier.enqueue(normalized) {
                admitted += 1;
            }
        }
        frontier.mark_done(&entry);
    }

    stats.links_admitted.fetch_add(admitted, Ordering::Relaxed);
    stats.pages_crawled.fetch_add(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::MemorySink;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicUsize;

    use super::super::fetcher::{FetchError, RenderedPage};

    fn test_config(seeds: Vec<&str>) -> CrawlConfig {
        CrawlConfig {
            seeds: seeds.into_iter().map(String::from).collect(),
            max_concurrency: 4,
            max_requests_per_crawl: 50,
            fetch_timeout_secs: 5,
            max_retries: 1,
        }
    }

    /// Scripted fetcher serving canned HTML per path
    struct ScriptedFetcher {
        pages: HashMap<String, String>,
        fetches: AtomicUsize,
    }

    impl ScriptedFetcher {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(path, html)| (path.to_string(), html.to_string()))
                    .collect(),
                fetches: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Fetcher for ScriptedFetcher {
        async fn fetch(
            &self,
            url: &Url,
            _timeout: Duration,
        ) -> Result<RenderedPage, FetchError> {
            self.fetches.fetch_add(1, Ordering::Relaxed);
            match self.pages.get(url.path()) {
                Some(html) => Ok(RenderedPage {
                    url: url.clone(),
                    html: html.clone(),
                }),
                None => Err(FetchError::NetworkError("no such page".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_single_page_run() {
        let fetcher = ScriptedFetcher::new(&[(
            "/",
            r#"<html><body><h1>Home</h1><p>hi</p></body></html>"#,
        )]);
        let mut scheduler =
            Scheduler::new(&test_config(vec!["https://example.com/"]), fetcher, MemorySink::new())
                .unwrap();

        assert_eq!(scheduler.phase(), CrawlPhase::Idle);
        let stats = scheduler.run().await;

        assert_eq!(scheduler.phase(), CrawlPhase::Terminated);
        assert_eq!(stats.pages_crawled, 1);
        assert_eq!(stats.records_written, 1);
        assert_eq!(stats.pages_failed, 0);
    }

    #[tokio::test]
    async fn test_discovered_links_are_followed() {
        let fetcher = ScriptedFetcher::new(&[
            ("/", r#"<html><body><a href="/a">a</a><a href="/b">b</a></body></html>"#),
            ("/a", r#"<html><body><p>a</p></body></html>"#),
            ("/b", r#"<html><body><p>b</p></body></html>"#),
        ]);
        let mut scheduler =
            Scheduler::new(&test_config(vec!["https://example.com/"]), fetcher, MemorySink::new())
                .unwrap();

        let stats = scheduler.run().await;

        assert_eq!(stats.pages_crawled, 3);
        assert_eq!(stats.links_admitted, 2);
        assert_eq!(scheduler.dispatched(), 3);
    }

    #[tokio::test]
    async fn test_failure_does_not_abort_run() {
        // "/missing" always errors; the rest of the crawl still completes.
        let fetcher = ScriptedFetcher::new(&[
            (
                "/",
                r#"<html><body><a href="/missing">m</a><a href="/ok">ok</a></body></html>"#,
            ),
            ("/ok", r#"<html><body><p>fine</p></body></html>"#),
        ]);
        let mut scheduler =
            Scheduler::new(&test_config(vec!["https://example.com/"]), fetcher, MemorySink::new())
                .unwrap();

        let stats = scheduler.run().await;

        assert_eq!(stats.pages_crawled, 2);
        assert_eq!(stats.pages_failed, 1);
        assert_eq!(scheduler.phase(), CrawlPhase::Terminated);
        assert_eq!(
            scheduler.entry_state(&Url::parse("https://example.com/missing").unwrap()),
            Some(EntryState::Failed)
        );
    }

    #[tokio::test]
    async fn test_budget_bounds_dispatches() {
        let mut config = test_config(vec!["https://example.com/"]);
        config.max_requests_per_crawl = 2;

        let fetcher = ScriptedFetcher::new(&[
            (
                "/",
                r#"<html><body><a href="/1">1</a><a href="/2">2</a><a href="/3">3</a></body></html>"#,
            ),
            ("/1", r#"<html><body><p>1</p></body></html>"#),
            ("/2", r#"<html><body><p>2</p></body></html>"#),
            ("/3", r#"<html><body><p>3</p></body></html>"#),
        ]);
        let mut scheduler = Scheduler::new(&config, fetcher, MemorySink::new()).unwrap();

        scheduler.run().await;

        assert_eq!(scheduler.dispatched(), 2);
        assert_eq!(scheduler.pending_remaining(), 2);
    }

    /// Sink whose appends always fail
    struct FailingSink;

    #[async_trait]
    impl Sink for FailingSink {
        async fn append(
            &self,
            _record: &crate::sink::PageRecord,
        ) -> Result<(), crate::sink::SinkError> {
            Err(crate::sink::SinkError::WriteFailed("disk full".to_string()))
        }
    }

    #[tokio::test]
    async fn test_sink_failure_does_not_fail_the_url() {
        let fetcher = ScriptedFetcher::new(&[(
            "/",
            r#"<html><body><a href="/a">a</a></body></html>"#,
        ), ("/a", r#"<html><body><p>a</p></body></html>"#)]);
        let mut scheduler =
            Scheduler::new(&test_config(vec!["https://example.com/"]), fetcher, FailingSink)
                .unwrap();

        let stats = scheduler.run().await;

        // Both pages crawled and links followed despite zero records written
        assert_eq!(stats.pages_crawled, 2);
        assert_eq!(stats.records_written, 0);
        assert_eq!(stats.sink_errors, 2);
        assert_eq!(stats.pages_failed, 0);
        assert_eq!(
            scheduler.entry_state(&Url::parse("https://example.com/").unwrap()),
            Some(EntryState::Done)
        );
    }
}
