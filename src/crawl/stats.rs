// src/crawl/stats.rs
// =============================================================================
// Crawl-wide counters, owned by the Crawler and updated by its workers.
//
// - errors: fetches that failed at the network level
// - per_domain: how many links each host received from crawled pages
// - per_status: how many fetches returned each status code
//
// At the end of the run a RunStatistics snapshot is taken and handed to the
// result sink exactly once.
// =============================================================================

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};
use url::Url;

/// End-of-run summary. BTreeMaps keep the output sorted and stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    pub total_completed: usize,
    pub total_errors: usize,
    pub per_domain: BTreeMap<String, usize>,
    pub per_status: BTreeMap<String, usize>,
}

#[derive(Default)]
pub struct StatsCollector {
    errors: AtomicUsize,
    counts: Mutex<Counts>,
}

#[derive(Default)]
struct Counts {
    per_domain: BTreeMap<String, usize>,
    per_status: BTreeMap<String, usize>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    // Counts one successfully fetched and parsed page
    //
    // Parameters:
    //   status: HTTP status code of the response
    //   links: the distinct, filter-accepted links found on the page
    pub fn record_page(&self, status: u16, links: &HashSet<Url>) {
        let mut counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);

        *counts.per_status.entry(status.to_string()).or_default() += 1;

        for host in links.iter().filter_map(|link| link.host_str()) {
            *counts.per_domain.entry(host.to_string()).or_default() += 1;
        }
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self, total_completed: usize) -> RunStatistics {
        let counts = self.counts.lock().unwrap_or_else(PoisonError::into_inner);
        RunStatistics {
            total_completed,
            total_errors: self.errors(),
            per_domain: counts.per_domain.clone(),
            per_status: counts.per_status.clone(),
        }
    }
}
