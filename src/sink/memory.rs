// src/sink/memory.rs
// In-memory ResultSink: nothing is persisted, everything can be inspected.

use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

use super::{FetchRecord, ResultSink};
use crate::crawl::RunStatistics;
use crate::error::SinkError;

#[derive(Debug, Default)]
pub struct MemorySink {
    records: Mutex<Vec<FetchRecord>>,
    summaries: Mutex<Vec<RunStatistics>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every record received so far, in call order.
    #[cfg(test)]
    pub fn records(&self) -> Vec<FetchRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Every summary received so far. A finished crawl leaves exactly one.
    #[cfg(test)]
    pub fn summaries(&self) -> Vec<RunStatistics> {
        self.summaries.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[async_trait]
impl ResultSink for MemorySink {
    async fn record_fetch(&self, record: &FetchRecord) -> Result<(), SinkError> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        Ok(())
    }

    async fn record_run_summary(&self, summary: &RunStatistics) -> Result<(), SinkError> {
        self.summaries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(summary.clone());
        Ok(())
    }
}
