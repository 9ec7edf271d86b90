use async_trait::async_trait;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use super::{PageRecord, Sink, SinkError};

/// JSON-Lines sink: one serialized record per line, appended in completion
/// order
pub struct JsonLinesSink {
    file: Mutex<File>,
}

impl JsonLinesSink {
    /// Opens (or creates) the records file for appending
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| SinkError::WriteFailed(format!("open {}: {}", path.display(), e)))?;

        Ok(Self {
            file: Mutex::new(file),
        })
    }
}

#[async_trait]
impl Sink for JsonLinesSink {
    async fn append(&self, record: &PageRecord) -> Result<(), SinkError> {
        let line = serde_json::to_string(record)
            .map_err(|e| SinkError::WriteFailed(e.to_string()))?;

        let mut file = self.file.lock().unwrap();
        writeln!(file, "{}", line).map_err(|e| SinkError::WriteFailed(e.to_string()))?;

        Ok(())
    }
}
