// src/config.rs
// =============================================================================
// Everything a crawl needs to know before it starts.
//
// A CrawlConfig is built once (usually from the command line, see cli.rs),
// validated, and never changed while the crawl runs.
// =============================================================================

use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::page::UrlFilter;

pub const DEFAULT_WORKERS: usize = 5;
pub const DEFAULT_BUDGET: usize = 25;
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(100);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Where the crawl starts. Seeds count against the budget like any link.
    pub seeds: Vec<String>,
    pub filter: UrlFilter,
    /// Number of concurrent workers
    pub workers: usize,
    /// Maximum number of URLs ever admitted, seeds included
    pub budget: usize,
    /// Pause taken by a worker before every fetch
    pub settle_delay: Duration,
    pub request_timeout: Duration,
}

impl CrawlConfig {
    pub fn new(seeds: Vec<String>) -> Self {
        Self {
            seeds,
            filter: UrlFilter::default(),
            workers: DEFAULT_WORKERS,
            budget: DEFAULT_BUDGET,
            settle_delay: DEFAULT_SETTLE_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    // Checks the numbers and parses the seeds
    //
    // Returns: the seed URLs, fragment-stripped and deduplicated in order
    //
    // Seeds are not run through the UrlFilter: if you ask for a URL
    // explicitly, you get it.
    pub fn validate(&self) -> Result<Vec<Url>, ConfigError> {
        if self.workers == 0 {
            return Err(ConfigError::NoWorkers);
        }
        if self.budget == 0 {
            return Err(ConfigError::ZeroBudget);
        }

        let mut seeds: Vec<Url> = Vec::with_capacity(self.seeds.len());
        for raw in &self.seeds {
            let mut url = Url::parse(raw).map_err(|source| ConfigError::InvalidSeed {
                url: raw.clone(),
                source,
            })?;
            url.set_fragment(None);

            if !seeds.contains(&url) {
                seeds.push(url);
            }
        }

        Ok(seeds)
    }
}
