//! Crawl frontier: the set of known URLs and their completion state
//!
//! The frontier owns deduplication, the pending queue, and the global
//! request budget. Entries are created when a URL is first discovered and
//! never removed, which is what guarantees a URL is admitted at most once
//! per run. The scheduler serializes access behind a mutex, so every
//! operation here is one critical section.

use std::collections::{HashMap, VecDeque};
use url::Url;

/// Lifecycle of a frontier entry
///
/// Transitions: Pending -> InFlight -> {Done | Failed}, with the single
/// allowed regression InFlight -> Pending when a transient failure is
/// requeued under the attempts cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryState {
    Pending,
    InFlight,
    Done,
    Failed,
}

/// A claim on one pending URL, handed to exactly one pipeline
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// The claimed URL
    pub url: Url,

    /// Dispatch count for this URL including the current one
    pub attempts: u32,
}

/// Outcome of reporting a failure back to the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// The URL went back to Pending for another attempt
    Requeued,
    /// The URL is terminally Failed
    GaveUp,
}

/// Process-wide dispatch counter with a fixed ceiling
///
/// Monotonically increasing; once the ceiling is reached the frontier stops
/// yielding Pending entries while in-flight work drains.
#[derive(Debug)]
pub struct CrawlBudget {
    dispatched: u32,
    ceiling: u32,
}

impl CrawlBudget {
    pub fn new(ceiling: u32) -> Self {
        Self {
            dispatched: 0,
            ceiling,
        }
    }

    /// True while another dispatch is allowed
    pub fn has_remaining(&self) -> bool {
        self.dispatched < self.ceiling
    }

    /// Total URLs dispatched so far
    pub fn dispatched(&self) -> u32 {
        self.dispatched
    }

    fn consume(&mut self) {
        self.dispatched += 1;
    }
}

#[derive(Debug)]
struct Slot {
    state: EntryState,
    attempts: u32,
}

/// The crawl frontier: pending/visited bookkeeping for one run
pub struct Frontier {
    entries: HashMap<Url, Slot>,
    pending: VecDeque<Url>,
    budget: CrawlBudget,
    max_attempts: u32,
}

impl Frontier {
    /// Creates a frontier with the given request ceiling and retry allowance
    ///
    /// A URL may be dispatched at most `max_retries + 1` times.
    pub fn new(max_requests: u32, max_retries: u32) -> Self {
        Self {
            entries: HashMap::new(),
            pending: VecDeque::new(),
            budget: CrawlBudget::new(max_requests),
            max_attempts: max_retries.saturating_add(1),
        }
    }

    /// Admits a URL if it has never been seen this run
    ///
    /// Idempotent: returns true if the URL was newly admitted, false for a
    /// duplicate. Duplicates are never re-queued, whatever state the
    /// original entry is in.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.entries.contains_key(&url) {
            return false;
        }

        self.entries.insert(
            url.clone(),
            Slot {
                state: EntryState::Pending,
                attempts: 0,
            },
        );
        self.pending.push_back(url);
        true
    }

    /// Claims one pending URL, marking it InFlight and consuming budget
    ///
    /// The claim and state transition happen in this single call, so no two
    /// concurrent pipelines can receive the same URL. Returns None once the
    /// budget ceiling is reached or nothing is Pending.
    pub fn next_pending(&mut self) -> Option<FrontierEntry> {
        if !self.budget.has_remaining() {
            return None;
        }

        while let Some(url) = self.pending.pop_front() {
            let Some(slot) = self.entries.get_mut(&url) else {
                continue;
            };
            if slot.state != EntryState::Pending {
                continue;
            }

            slot.state = EntryState::InFlight;
            slot.attempts += 1;
            self.budget.consume();

            return Some(FrontierEntry {
                url,
                attempts: slot.attempts,
            });
        }

        None
    }

    /// Marks a claimed URL as successfully processed
    pub fn mark_done(&mut self, entry: &FrontierEntry) {
        if let Some(slot) = self.entries.get_mut(&entry.url) {
            slot.state = EntryState::Done;
        }
    }

    /// Records a failure for a claimed URL and decides retry vs. drop
    ///
    /// Retryable failures re-admit the URL to Pending while its attempts
    /// stay under the cap; everything else becomes terminally Failed.
    pub fn mark_failed(&mut self, entry: &FrontierEntry, retryable: bool) -> RetryDecision {
        let Some(slot) = self.entries.get_mut(&entry.url) else {
            return RetryDecision::GaveUp;
        };

        if retryable && slot.attempts < self.max_attempts {
            slot.state = EntryState::Pending;
            self.pending.push_back(entry.url.clone());
            RetryDecision::Requeued
        } else {
            slot.state = EntryState::Failed;
            RetryDecision::GaveUp
        }
    }

    /// Current state of a known URL
    pub fn state_of(&self, url: &Url) -> Option<EntryState> {
        self.entries.get(url).map(|slot| slot.state)
    }

    /// Number of entries currently in the given state
    pub fn count_in(&self, state: EntryState) -> usize {
        self.entries
            .values()
            .filter(|slot| slot.state == state)
            .count()
    }

    /// Total URLs ever admitted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total URLs dispatched so far
    pub fn dispatched(&self) -> u32 {
        self.budget.dispatched()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse(&format!("https://example.com{}", path)).unwrap()
    }

    fn create_frontier() -> Frontier {
        Frontier::new(50, 1)
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let mut frontier = create_frontier();
        assert!(frontier.enqueue(url("/a")));
        assert!(!frontier.enqueue(url("/a")));
        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.count_in(EntryState::Pending), 1);
    }

    #[test]
    fn test_duplicate_of_done_entry_not_requeued() {
        let mut frontier = create_frontier();
        frontier.enqueue(url("/a"));
        let entry = frontier.next_pending().unwrap();
        frontier.mark_done(&entry);

        assert!(!frontier.enqueue(url("/a")));
        assert!(frontier.next_pending().is_none());
    }

    #[test]
    fn test_next_pending_claims_in_fifo_order() {
        let mut frontier = create_frontier();
        frontier.enqueue(url("/a"));
        frontier.enqueue(url("/b"));

        assert_eq!(frontier.next_pending().unwrap().url, url("/a"));
        assert_eq!(frontier.next_pending().unwrap().url, url("/b"));
        assert!(frontier.next_pending().is_none());
    }

    #[test]
    fn test_claimed_url_is_in_flight() {
        let mut frontier = create_frontier();
        frontier.enqueue(url("/a"));
        let entry = frontier.next_pending().unwrap();

        assert_eq!(entry.attempts, 1);
        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::InFlight));
        // The same URL can never be claimed twice concurrently
        assert!(frontier.next_pending().is_none());
    }

    #[test]
    fn test_budget_ceiling_stops_dispatch() {
        let mut frontier = Frontier::new(2, 0);
        frontier.enqueue(url("/a"));
        frontier.enqueue(url("/b"));
        frontier.enqueue(url("/c"));

        assert!(frontier.next_pending().is_some());
        assert!(frontier.next_pending().is_some());
        assert!(frontier.next_pending().is_none());
        assert_eq!(frontier.dispatched(), 2);
        assert_eq!(frontier.count_in(EntryState::Pending), 1);
    }

    #[test]
    fn test_transient_failure_requeues_until_cap() {
        let mut frontier = Frontier::new(50, 1);
        frontier.enqueue(url("/a"));

        let first = frontier.next_pending().unwrap();
        assert_eq!(
            frontier.mark_failed(&first, true),
            RetryDecision::Requeued
        );
        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::Pending));

        let second = frontier.next_pending().unwrap();
        assert_eq!(second.attempts, 2);
        assert_eq!(frontier.mark_failed(&second, true), RetryDecision::GaveUp);
        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::Failed));
        assert!(frontier.next_pending().is_none());
    }

    #[test]
    fn test_permanent_failure_never_requeues() {
        let mut frontier = Frontier::new(50, 3);
        frontier.enqueue(url("/a"));

        let entry = frontier.next_pending().unwrap();
        assert_eq!(frontier.mark_failed(&entry, false), RetryDecision::GaveUp);
        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::Failed));
    }

    #[test]
    fn test_zero_retries_means_single_attempt() {
        let mut frontier = Frontier::new(50, 0);
        frontier.enqueue(url("/a"));

        let entry = frontier.next_pending().unwrap();
        assert_eq!(frontier.mark_failed(&entry, true), RetryDecision::GaveUp);
    }

    #[test]
    fn test_mark_done() {
        let mut frontier = create_frontier();
        frontier.enqueue(url("/a"));
        let entry = frontier.next_pending().unwrap();
        frontier.mark_done(&entry);

        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::Done));
        assert_eq!(frontier.count_in(EntryState::Done), 1);
    }

    #[test]
    fn test_retry_consumes_budget() {
        let mut frontier = Frontier::new(2, 5);
        frontier.enqueue(url("/a"));

        let first = frontier.next_pending().unwrap();
        frontier.mark_failed(&first, true);
        let second = frontier.next_pending().unwrap();
        assert_eq!(frontier.dispatched(), 2);

        // Ceiling reached: the entry is requeued but can never be
        // dispatched again this run.
        assert_eq!(frontier.mark_failed(&second, true), RetryDecision::Requeued);
        assert!(frontier.next_pending().is_none());
        assert_eq!(frontier.state_of(&url("/a")), Some(EntryState::Pending));
    }
}
