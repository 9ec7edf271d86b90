//! Record sinks: where extracted page records end up
//!
//! The crawl core only requires an append-only contract; implementations
//! decide the storage format. `JsonLinesSink` writes one JSON object per
//! line; `MemorySink` buffers records in process for tests and embedders.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use url::Url;

mod jsonl;
mod memory;

pub use jsonl::JsonLinesSink;
pub use memory::MemorySink;

/// Errors that can occur while persisting a record
///
/// Persistence is best effort: the scheduler logs these and keeps crawling.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write record: {0}")]
    WriteFailed(String),
}

/// One extracted page
///
/// Immutable once constructed; ownership passes to the sink on append.
/// `links` holds every resolvable anchor target in document order, including
/// cross-domain ones the frontier will never visit.
#[derive(Debug, Clone, Serialize)]
pub struct PageRecord {
    pub url: Url,
    pub title: Option<String>,
    pub description: Option<String>,
    pub paragraphs: Vec<String>,
    pub links: Vec<Url>,
    pub fetched_at: DateTime<Utc>,
}

/// Append-only persistence contract for extracted records
///
/// Implementations must be safe to call from concurrent pipelines.
#[async_trait]
pub trait Sink: Send + Sync {
    /// Appends one record
    async fn append(&self, record: &PageRecord) -> Result<(), SinkError>;
}

#[async_trait]
impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    async fn append(&self, record: &PageRecord) -> Result<(), SinkError> {
        (**self).append(record).await
    }
}
