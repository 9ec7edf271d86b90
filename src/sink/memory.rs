use async_trait::async_trait;
use std::sync::Mutex;

use super::{PageRecord, Sink, SinkError};

/// In-process sink that buffers records in memory
///
/// Useful for tests and for embedding the crawl core in a larger program
/// that wants the records back directly.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<PageRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything appended so far
    pub fn records(&self) -> Vec<PageRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn append(&self, record: &PageRecord) -> Result<(), SinkError> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
