// src/crawl/scheduler.rs
// =============================================================================
// The Crawler: a fixed pool of workers draining the frontier's queue.
//
// How a run works:
// 1. Admit the seed URLs through the frontier (they use up budget too)
// 2. Start N workers
// 3. Each worker loops: take a URL -> wait a moment -> fetch -> parse ->
//    record -> admit the new links -> mark done -> acknowledge
// 4. When the queue reports that every URL ever queued has been
//    acknowledged, cancel the (now idle) workers and wait for them
// 5. Hand the final statistics to the result sink, once
//
// A failed fetch is counted and logged, and the worker moves on. Nothing a
// single URL does can stop the crawl.
//
// Rust concepts:
// - Arc: shared ownership of the crawl state between spawned tasks
// - tokio::spawn: runs each worker as its own task
// - CancellationToken: one signal that every idle worker can wait on
// =============================================================================

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, trace, warn};
use url::Url;

use super::frontier::Frontier;
use super::stats::{RunStatistics, StatsCollector};
use crate::config::CrawlConfig;
use crate::error::ConfigError;
use crate::fetch::{FetchedPage, Transport};
use crate::page::{parse_page, UrlFilter};
use crate::sink::{FetchRecord, ResultSink};

// What a worker is doing right now (only used for trace logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkerState {
    Idle,
    Fetching,
    Parsing,
    Expanding,
    Cancelled,
}

pub struct Crawler {
    seeds: Vec<Url>,
    workers: usize,
    shared: Arc<Shared>,
}

// State every worker needs, behind one Arc
struct Shared {
    frontier: Frontier,
    stats: StatsCollector,
    filter: UrlFilter,
    settle_delay: Duration,
    transport: Arc<dyn Transport>,
    sink: Arc<dyn ResultSink>,
}

impl Crawler {
    // Sets up a crawl
    //
    // Parameters:
    //   config: seeds, filter rules, worker count, budget, delays
    //   transport: how pages are fetched (HttpTransport for real crawls)
    //   sink: where per-page records and the final summary go
    //
    // Returns: Err if the configuration is invalid. Nothing has been fetched
    //          at that point.
    pub fn new(
        config: &CrawlConfig,
        transport: Arc<dyn Transport>,
        sink: Arc<dyn ResultSink>,
    ) -> Result<Self, ConfigError> {
        let seeds = config.validate()?;

        Ok(Self {
            seeds,
            workers: config.workers,
            shared: Arc::new(Shared {
                frontier: Frontier::new(config.budget),
                stats: StatsCollector::new(),
                filter: config.filter.clone(),
                settle_delay: config.settle_delay,
                transport,
                sink,
            }),
        })
    }

    // Runs the crawl to completion and returns the final statistics
    //
    // A run always finishes with statistics, even when every single fetch
    // failed. Meant to be called once per Crawler.
    pub async fn run(&self) -> RunStatistics {
        let shared = &self.shared;
        let admitted = shared.frontier.try_admit(self.seeds.iter().cloned());

        info!(
            seeds = admitted.len(),
            workers = self.workers,
            budget = shared.frontier.budget(),
            "Starting crawl"
        );

        let cancel = CancellationToken::new();
        let handles: Vec<_> = (0..self.workers)
            .map(|id| {
                let shared = Arc::clone(shared);
                let cancel = cancel.clone();
                tokio::spawn(async move { shared.worker(id, cancel).await })
            })
            .collect();

        // Empty queue AND every taken URL acknowledged
        shared.frontier.queue().join().await;
        cancel.cancel();

        for result in join_all(handles).await {
            if let Err(e) = result {
                error!(error = %e, "Worker task ended abnormally");
            }
        }

        if !shared.frontier.is_exhausted() {
            warn!(
                seen = shared.frontier.discovered(),
                done = shared.frontier.done_count(),
                "Crawl stopped with URLs that never completed"
            );
        }

        let summary = shared.stats.snapshot(shared.frontier.done_count());
        info!(
            completed = summary.total_completed,
            errors = summary.total_errors,
            found = shared.frontier.discovered(),
            "Crawl finished"
        );

        if let Err(e) = shared.sink.record_run_summary(&summary).await {
            error!(error = %e, "Failed to store run statistics");
        }

        summary
    }

    /// Read-only view of the crawl state (seen/done sets), for reporting.
    pub fn frontier(&self) -> &Frontier {
        &self.shared.frontier
    }
}

impl Shared {
    // One worker: keep taking URLs until the crawler cancels us
    async fn worker(&self, id: usize, cancel: CancellationToken) {
        trace!(worker = id, state = ?WorkerState::Idle);

        while let Some(item) = self.frontier.queue().get(&cancel).await {
            self.process_one(id, &item.url).await;
            trace!(worker = id, state = ?WorkerState::Idle);
            // `item` is dropped here, which acknowledges it to the queue
        }

        trace!(worker = id, state = ?WorkerState::Cancelled);
    }

    // One fetch cycle for one URL. Never fails: errors are counted and logged.
    async fn process_one(&self, id: usize, url: &Url) {
        tokio::time::sleep(self.settle_delay).await;

        trace!(worker = id, state = ?WorkerState::Fetching, url = %url);
        match self.transport.fetch(url).await {
            Ok(FetchedPage {
                final_url,
                status,
                body_len,
                body,
            }) => {
                trace!(worker = id, state = ?WorkerState::Parsing, url = %url);
                // Relative links are relative to where we ended up, not to
                // where we started
                let parsed = parse_page(&final_url, &body, &self.filter);
                self.stats.record_page(status, &parsed.links);

                let record = FetchRecord {
                    url: url.to_string(),
                    status,
                    content_size: body_len,
                    title: parsed.title,
                };
                if let Err(e) = self.sink.record_fetch(&record).await {
                    error!(url = %url, error = %e, "Failed to store fetch result");
                }

                trace!(worker = id, state = ?WorkerState::Expanding, url = %url);
                let found = parsed.links.len();
                let admitted = self.frontier.try_admit(parsed.links);
                debug!(
                    url = %url,
                    status,
                    links = found,
                    admitted = admitted.len(),
                    "Crawled page"
                );
            }
            Err(e) => {
                self.stats.record_error();
                warn!(url = %url, error = %e, "Fetch failed");
            }
        }

        self.frontier.mark_done(url);
    }
}
