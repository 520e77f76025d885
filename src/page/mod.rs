// src/page/mod.rs
// =============================================================================
// Everything that happens to a page after it has been downloaded.
//
// Submodules:
// - filter: resolves hrefs into absolute URLs and applies the crawl rules
// - html: extracts the title and the accepted links from the markup
// =============================================================================

mod filter;
mod html;

pub use filter::UrlFilter;
pub use html::parse_page;
