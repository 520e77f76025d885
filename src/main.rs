// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging, the HTTP transport and the result sink
// 3. Run the crawl
// 4. Print what was found and exit with the proper code
//    (0 = crawl completed, 2 = error)
//
// A crawl where every fetch failed still "completed": it exits with 0 and
// reports zero successful pages.
// =============================================================================

// Module declarations - tells Rust about our other source files
mod cli;     // src/cli.rs - command-line parsing
mod config;  // src/config.rs - validated crawl settings
mod crawl;   // src/crawl/ - frontier, work queue and worker pool
mod error;   // src/error.rs - typed errors
mod fetch;   // src/fetch/ - downloading pages
mod page;    // src/page/ - link filtering and HTML parsing
mod sink;    // src/sink/ - where results are stored

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

use cli::Cli;
use crawl::{Crawler, RunStatistics};
use fetch::HttpTransport;
use sink::{MemorySink, ResultSink, SqliteSink};

#[tokio::main]
async fn main() {
    // Logs go to stderr so they never mix with the report on stdout
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sitecrawl=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let exit_code = match run().await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Everything the JSON report contains
#[derive(Debug, Serialize)]
struct CrawlReport {
    seen: Vec<String>,
    crawled: usize,
    found: usize,
    elapsed_secs: f64,
    statistics: RunStatistics,
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.to_config();

    let transport = HttpTransport::new(config.request_timeout)
        .context("Failed to create HTTP client")?;

    let sink: Arc<dyn ResultSink> = if cli.no_db {
        Arc::new(MemorySink::new())
    } else {
        let sqlite = SqliteSink::open(&cli.db)
            .await
            .with_context(|| format!("Failed to open database {}", cli.db.display()))?;
        Arc::new(sqlite)
    };

    let crawler = Crawler::new(&config, Arc::new(transport), sink)
        .context("Invalid crawl configuration")?;

    let start = Instant::now();
    let statistics = crawler.run().await;
    let elapsed = start.elapsed();

    let mut seen: Vec<String> = crawler
        .frontier()
        .seen()
        .into_iter()
        .map(String::from)
        .collect();
    seen.sort();

    let report = CrawlReport {
        crawled: crawler.frontier().done().len(),
        found: seen.len(),
        seen,
        elapsed_secs: elapsed.as_secs_f64(),
        statistics,
    };

    print_report(&report, cli.json)
}

// Prints the report either as plain text or JSON
fn print_report(report: &CrawlReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    println!("Results:");
    for url in &report.seen {
        println!("{}", url);
    }
    println!("Crawled: {} URLs", report.crawled);
    println!("Found: {} URLs", report.found);
    println!("Errors: {}", report.statistics.total_errors);
    println!("Done in {:.2}s", report.elapsed_secs);

    Ok(())
}
