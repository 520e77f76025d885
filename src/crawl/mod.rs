// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling from one or more seed URLs
// - A fixed pool of concurrent workers sharing one work queue
// - Every URL is fetched at most once, and at most `budget` URLs are ever
//   admitted
// - Polite crawling with a short pause before every request
//
// Submodules:
// - queue: the shared work queue with its "everything finished" signal
// - frontier: seen/done bookkeeping and the discovery budget
// - stats: crawl-wide counters
// - scheduler: the Crawler itself and its workers
// =============================================================================

mod frontier;
mod queue;
mod scheduler;
mod stats;

pub use scheduler::Crawler;
pub use stats::RunStatistics;
