// src/error.rs
// =============================================================================
// Typed errors for the crawler.
//
// Only two kinds of failure ever leave a worker's hands:
// - ConfigError: the crawl can't even start (bad seeds, zero workers, ...)
// - SinkError: the storage layer refused a write
//
// FetchError is different: it's caught inside the worker cycle, counted,
// logged, and then forgotten. It never stops the crawl.
//
// Rust concepts:
// - thiserror: derive macro that writes the Display and Error impls for us
// - #[from]: automatic conversion so the ? operator works across error types
// =============================================================================

use thiserror::Error;

// Problems detected while turning command-line input into a CrawlConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("worker count must be at least 1")]
    NoWorkers,

    #[error("discovery budget must be at least 1")]
    ZeroBudget,

    #[error("invalid seed URL '{url}': {source}")]
    InvalidSeed {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

// Network-level failures while fetching a page
//
// A non-2xx status code is NOT a FetchError. A 404 page is still a page:
// it gets parsed, recorded, and counted under its status code.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("too many redirects")]
    TooManyRedirects,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),

    #[error("request failed: {0}")]
    Request(String),
}

// Failures reported by a ResultSink implementation
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to encode statistics: {0}")]
    Encode(#[from] serde_json::Error),
}
