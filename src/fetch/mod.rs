// src/fetch/mod.rs
// =============================================================================
// The crawler's view of the network: one trait (Transport) and the reqwest
// implementation we use for real crawls. Tests plug in their own Transport.
// =============================================================================

mod http;

pub use http::{FetchedPage, HttpTransport, Transport};
