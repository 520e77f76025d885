// src/page/filter.rs
// =============================================================================
// This module turns the raw href values we find on a page into absolute,
// canonical URLs, and decides which of them the crawler is allowed to visit.
//
// Steps, in order:
// 1. Resolve the href against the page URL (relative paths, "..", etc.)
// 2. Strip the #fragment, so "page#a" and "page#b" are the same page
// 3. Reject hosts that aren't on the allow-list (if there is one)
// 4. Reject paths whose extension is on the block-list (if there is one)
//
// A rejected link is not an error. It just doesn't come back.
//
// Rust concepts:
// - Option<T>: "maybe a URL" is the whole return type
// - HashSet: O(1) membership checks for domains and extensions
// =============================================================================

use std::collections::HashSet;
use url::Url;

// The reachability rules for a crawl. Built once, never changed afterwards.
//
// None means "no rule": None for allowed_domains allows every host,
// None for blocked_extensions blocks nothing.
#[derive(Debug, Clone, Default)]
pub struct UrlFilter {
    allowed_domains: Option<HashSet<String>>,
    blocked_extensions: Option<HashSet<String>>,
}

impl UrlFilter {
    pub fn new(
        allowed_domains: Option<HashSet<String>>,
        blocked_extensions: Option<HashSet<String>>,
    ) -> Self {
        Self {
            allowed_domains,
            blocked_extensions,
        }
    }

    /// Resolves `candidate` against `base` and applies the filter rules.
    ///
    /// Returns `None` when the link can't be resolved or is filtered out.
    /// Other schemes (mailto:, ftp:) pass when no allow-list is set; the
    /// transport then fails them like any unreachable URL. The same inputs
    /// always give the same answer.
    pub fn resolve(&self, base: &Url, candidate: &str) -> Option<Url> {
        // Url::join handles absolute links too: the base is simply ignored
        let mut url = base.join(candidate.trim()).ok()?;

        url.set_fragment(None);

        if let Some(domains) = &self.allowed_domains {
            let host = url.host_str()?;
            if !domains.contains(host) {
                return None;
            }
        }

        if let Some(blocked) = &self.blocked_extensions {
            let ext = path_extension(&url);
            if !ext.is_empty() && blocked.contains(ext) {
                return None;
            }
        }

        Some(url)
    }
}

// Returns the extension of the last path segment, leading dot included
//
// Examples:
//   /img/photo.jpg     -> ".jpg"
//   /archive.tar.gz    -> ".gz"
//   /docs/             -> ""
//   /.hidden           -> ""   (a leading dot names the file, it's not a suffix)
//   /trailing.         -> ""
pub fn path_extension(url: &Url) -> &str {
    let path = url.path();
    let segment = path.rsplit('/').next().unwrap_or(path);

    match segment.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < segment.len() => &segment[pos..],
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(items: &[&str]) -> Option<HashSet<String>> {
        Some(items.iter().map(|s| s.to_string()).collect())
    }

    fn base() -> Url {
        Url::parse("https://example.com/docs/page.html").unwrap()
    }

    #[test]
    fn test_resolve_relative_link() {
        let filter = UrlFilter::default();
        let url = filter.resolve(&base(), "../about.html").unwrap();
        assert_eq!(url.as_str(), "https://example.com/about.html");
    }

    #[test]
    fn test_resolve_absolute_link_ignores_base() {
        let filter = UrlFilter::default();
        let url = filter.resolve(&base(), "https://other.com/x").unwrap();
        assert_eq!(url.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_fragment_is_stripped() {
        let filter = UrlFilter::default();
        let a = filter.resolve(&base(), "/guide#install").unwrap();
        let b = filter.resolve(&base(), "/guide#usage").unwrap();
        assert_eq!(a.as_str(), "https://example.com/guide");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fragment_only_link_points_at_base() {
        let filter = UrlFilter::default();
        let url = filter.resolve(&base(), "#top").unwrap();
        assert_eq!(url.as_str(), "https://example.com/docs/page.html");
    }

    #[test]
    fn test_allow_list_rejects_other_hosts() {
        let filter = UrlFilter::new(set(&["example.com"]), None);
        assert!(filter.resolve(&base(), "/ok").is_some());
        assert!(filter.resolve(&base(), "https://other.com/x").is_none());
        assert!(filter.resolve(&base(), "https://sub.example.com/").is_none());
    }

    #[test]
    fn test_block_list_rejects_extension() {
        let filter = UrlFilter::new(None, set(&[".jpg", ".css"]));
        assert!(filter.resolve(&base(), "/img.jpg").is_none());
        assert!(filter.resolve(&base(), "/style.css?v=3").is_none());
        assert!(filter.resolve(&base(), "/a.html").is_some());
        assert!(filter.resolve(&base(), "/no-extension").is_some());
    }

    #[test]
    fn test_block_list_is_case_sensitive() {
        let filter = UrlFilter::new(None, set(&[".jpg"]));
        assert!(filter.resolve(&base(), "/IMG.JPG").is_some());
    }

    #[test]
    fn test_other_schemes_pass_without_allow_list() {
        let filter = UrlFilter::default();
        let mail = filter.resolve(&base(), "mailto:a@b.com").unwrap();
        let ftp = filter.resolve(&base(), "ftp://example.com/x").unwrap();
        assert_eq!(mail.as_str(), "mailto:a@b.com");
        assert_eq!(ftp.as_str(), "ftp://example.com/x");
    }

    #[test]
    fn test_allow_list_rejects_hostless_schemes() {
        let filter = UrlFilter::new(set(&["example.com"]), None);
        assert!(filter.resolve(&base(), "mailto:test@example.com").is_none());
        assert!(filter.resolve(&base(), "ftp://example.com/x").is_some());
    }

    #[test]
    fn test_malformed_candidate_is_rejected() {
        let filter = UrlFilter::default();
        assert!(filter.resolve(&base(), "http://[::1").is_none());
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let filter = UrlFilter::new(set(&["example.com"]), set(&[".pdf"]));
        for href in ["/a", "b.pdf", "https://other.com", "./c/../d#x"] {
            assert_eq!(filter.resolve(&base(), href), filter.resolve(&base(), href));
        }
    }

    #[test]
    fn test_path_extension() {
        let ext = |s: &str| path_extension(&Url::parse(s).unwrap()).to_string();
        assert_eq!(ext("https://a.com/photo.jpg"), ".jpg");
        assert_eq!(ext("https://a.com/archive.tar.gz"), ".gz");
        assert_eq!(ext("https://a.com/v1.2/docs/"), "");
        assert_eq!(ext("https://a.com/.hidden"), "");
        assert_eq!(ext("https://a.com/"), "");
    }
}
