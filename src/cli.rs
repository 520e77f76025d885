// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// clap is a popular Rust library for parsing command-line arguments.
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// The parsed Cli is turned into a CrawlConfig (see config.rs) right away;
// nothing else in the program looks at raw arguments.
// =============================================================================

use clap::Parser;
use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{CrawlConfig, DEFAULT_BUDGET, DEFAULT_WORKERS};
use crate::page::UrlFilter;

// Seeds used when none are given on the command line
const DEFAULT_SEEDS: [&str; 2] = ["https://docs.python.org/", "https://pypi.org/help"];

#[derive(Parser, Debug)]
#[command(
    name = "sitecrawl",
    version,
    about = "Crawl websites breadth-first and record every page's status and title",
    long_about = "sitecrawl starts from one or more seed URLs, follows the links it finds with a \
                  fixed number of concurrent workers, and stops when no new pages are reachable \
                  or the URL budget is used up. Results are written to a SQLite database."
)]
pub struct Cli {
    /// URLs to start crawling from
    ///
    /// Defaults to https://docs.python.org/ and https://pypi.org/help
    pub seeds: Vec<String>,

    /// Only follow links to this host (repeatable)
    ///
    /// Example: --allow-domain docs.python.org --allow-domain pypi.org
    /// Without this flag every host is allowed.
    #[arg(long = "allow-domain", value_name = "HOST")]
    pub allow_domains: Vec<String>,

    /// Never follow links whose path ends in this extension (repeatable)
    ///
    /// Include the dot and mind the case: --block-ext .jpg --block-ext .pdf
    #[arg(long = "block-ext", value_name = ".EXT")]
    pub block_extensions: Vec<String>,

    /// Number of concurrent workers
    #[arg(long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// Maximum number of URLs to discover, seeds included
    #[arg(long = "max-urls", default_value_t = DEFAULT_BUDGET)]
    pub max_urls: usize,

    /// Pause before every request, in milliseconds
    #[arg(long = "delay-ms", default_value_t = 100)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds
    #[arg(long = "timeout-secs", default_value_t = 10)]
    pub timeout_secs: u64,

    /// SQLite database file for results
    #[arg(long, default_value = "crawler_data.db")]
    pub db: PathBuf,

    /// Keep results in memory only (no database file)
    #[arg(long = "no-db", conflicts_with = "db")]
    pub no_db: bool,

    /// Output results in JSON format instead of plain text
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    // Builds the crawl configuration from the parsed arguments
    //
    // Empty --allow-domain / --block-ext lists mean "no rule", not "allow
    // nothing" / "block nothing".
    pub fn to_config(&self) -> CrawlConfig {
        let seeds = if self.seeds.is_empty() {
            DEFAULT_SEEDS.iter().map(|s| s.to_string()).collect()
        } else {
            self.seeds.clone()
        };

        let allowed = non_empty_set(&self.allow_domains);
        let blocked = non_empty_set(&self.block_extensions);

        let mut config = CrawlConfig::new(seeds);
        config.filter = UrlFilter::new(allowed, blocked);
        config.workers = self.workers;
        config.budget = self.max_urls;
        config.settle_delay = Duration::from_millis(self.delay_ms);
        config.request_timeout = Duration::from_secs(self.timeout_secs);
        config
    }
}

fn non_empty_set(items: &[String]) -> Option<HashSet<String>> {
    if items.is_empty() {
        None
    } else {
        Some(items.iter().cloned().collect())
    }
}
