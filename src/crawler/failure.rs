//! Failure classification for crawl pipelines
//!
//! Transient failures go back to the frontier for a bounded retry;
//! permanent failures are terminal and discover no links. A failing URL
//! never aborts the run.

use super::extractor::ExtractError;
use super::fetcher::FetchError;
use super::frontier::{Frontier, FrontierEntry, RetryDecision};

/// How a pipeline failure should be treated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Worth another attempt if the attempts cap allows
    Transient,
    /// Retrying cannot help
    Permanent,
}

/// Classifies a fetch failure
///
/// Timeouts and network errors are often environmental and retry cleanly;
/// blocked navigation is a property of the target and is terminal.
pub fn classify_fetch(error: &FetchError) -> FailureClass {
    match error {
        FetchError::Timeout | FetchError::NetworkError(_) => FailureClass::Transient,
        FetchError::NavigationBlocked(_) => FailureClass::Permanent,
    }
}

/// Classifies an extraction failure: always terminal
pub fn classify_extract(_error: &ExtractError) -> FailureClass {
    FailureClass::Permanent
}

/// Records a failure against the frontier and logs the outcome
pub fn record_failure(
    frontier: &mut Frontier,
    entry: &FrontierEntry,
    class: FailureClass,
    message: &str,
) -> RetryDecision {
    let decision = frontier.mark_failed(entry, class == FailureClass::Transient);

    match decision {
        RetryDecision::Requeued => {
            tracing::warn!(
                "Retrying {} (attempt {}): {}",
                entry.url,
                entry.attempts,
                message
            );
        }
        RetryDecision::GaveUp => {
            tracing::error!("Request {} failed: {}", entry.url, message);
        }
    }

    decision
}
