// src/sink/mod.rs
// =============================================================================
// Where crawl results end up.
//
// The crawler only knows the ResultSink trait:
// - record_fetch: called once for every page fetched successfully
// - record_run_summary: called exactly once, after the last worker stopped
//
// How (and whether) results are stored is up to the implementation:
// - SqliteSink writes them to a SQLite database file
// - MemorySink keeps them in memory (tests, --no-db)
//
// Implementations are shared by all workers at once, so they must be
// Send + Sync, and they must apply writes in the order they were called.
// =============================================================================

mod memory;
mod sqlite;

pub use memory::MemorySink;
pub use sqlite::SqliteSink;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::crawl::RunStatistics;
use crate::error::SinkError;

// One fetched page, as handed to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRecord {
    pub url: String,
    pub status: u16,
    pub content_size: usize,
    pub title: String,
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record_fetch(&self, record: &FetchRecord) -> Result<(), SinkError>;

    async fn record_run_summary(&self, summary: &RunStatistics) -> Result<(), SinkError>;
}
