// src/page/html.rs
// =============================================================================
// This module pulls the two things the crawler cares about out of a page:
// - the <title> text
// - every <a href> that passes the UrlFilter
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
// - Is built on html5ever, so broken markup never makes it fail
//
// Malformed markup, unknown tags and anchors without href are simply
// ignored. Parsing can't fail; the worst case is no links and the default
// title.
// =============================================================================

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

use super::filter::UrlFilter;

// Title used when a page has no complete <title>...</title> element
pub const TITLE_NOT_FOUND: &str = "Title not found";

// Everything we learn from one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedPage {
    /// Filter-accepted links, deduplicated. No particular order.
    pub links: HashSet<Url>,
    pub title: String,
}

// Parses a page's markup
//
// Parameters:
//   base: the URL the page was served from (after redirects), used to
//         resolve relative links
//   markup: the HTML text
//   filter: decides which links are kept
//
// Example:
//   markup = "<title>Docs</title><a href='/a.html'>A</a><a href='/b.jpg'>B</a>"
//   base = "https://example.com/", filter blocks ".jpg"
//   result = ParsedPage { links: {"https://example.com/a.html"}, title: "Docs" }
pub fn parse_page(base: &Url, markup: &str, filter: &UrlFilter) -> ParsedPage {
    let document = Html::parse_document(markup);

    // Both selectors are constants and known to be valid
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let title_selector = Selector::parse("title").unwrap();

    let links = document
        .select(&anchor_selector)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| filter.resolve(base, href))
        .collect();

    // The first <title> wins, later ones are ignored. html5ever will happily
    // build a title element out of an unclosed <title> that runs to the end
    // of the file, so we also insist on a real closing tag after the opening
    // one. The text is kept as-is, whitespace included.
    let title = document
        .select(&title_selector)
        .next()
        .filter(|_| has_closing_title_tag(markup))
        .map(|element| element.text().collect::<String>())
        .unwrap_or_else(|| TITLE_NOT_FOUND.to_string());

    ParsedPage { links, title }
}

// True when a </title> close tag follows the first <title> open tag
fn has_closing_title_tag(markup: &str) -> bool {
    let bytes = markup.as_bytes();
    find_ignore_case(bytes, b"<title", 0)
        .and_then(|open| find_ignore_case(bytes, b"</title", open + b"<title".len()))
        .is_some()
}

fn find_ignore_case(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
        .map(|pos| pos + from)
}
