// src/fetch/http.rs
// =============================================================================
// This module downloads pages.
//
// Key functionality:
// - Makes HTTP GET requests, following redirects transparently
// - Reports WHERE we ended up (the final URL) so relative links on the page
//   are resolved against the right base
// - Turns reqwest's errors into our own FetchError categories
//
// Important: a 404 or a 500 is a perfectly good answer. Only network-level
// problems (timeouts, refused connections, redirect loops) are errors.
//
// Rust concepts:
// - Traits: Transport is an interface, so tests can swap in a fake network
// - async-trait: lets a trait have async methods
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

use crate::error::FetchError;

// Maximum number of redirects followed for a single fetch
const MAX_REDIRECTS: usize = 10;

// One downloaded document
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Where the request ended up after following redirects
    pub final_url: Url,
    pub status: u16,
    /// Size of the raw body in bytes
    pub body_len: usize,
    pub body: String,
}

// Anything that can fetch a URL
//
// Implementations must be safe to share between all workers at once
// (Send + Sync); the crawler never locks around them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

// The real network, backed by a reqwest Client
//
// reqwest::Client keeps a connection pool internally, so one HttpTransport is
// shared by every worker for the whole crawl.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    // Creates the transport
    //
    // Parameters:
    //   timeout: per-request timeout
    //
    // Returns: Err if the TLS backend can't be initialised
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(categorize_error)?;

        let final_url = response.url().clone();
        let status = response.status().as_u16();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok(FetchedPage {
            final_url,
            status,
            body_len: bytes.len(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

// Categorizes the different error types from reqwest
//
// reqwest errors can happen for many reasons:
// - Network timeout
// - DNS resolution failure or refused connection
// - Redirect loops
// - etc.
fn categorize_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        FetchError::Timeout
    } else if error.is_redirect() {
        FetchError::TooManyRedirects
    } else if error.is_connect() {
        FetchError::Connect(error.to_string())
    } else {
        FetchError::Request(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> HttpTransport {
        HttpTransport::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_page() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body("<title>Home</title>")
            .create_async()
            .await;

        let url = Url::parse(&server.url()).unwrap();
        let page = transport().fetch(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(page.status, 200);
        assert_eq!(page.body, "<title>Home</title>");
        assert_eq!(page.body_len, 19);
    }

    #[tokio::test]
    async fn test_not_found_is_not_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body("gone")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/missing", server.url())).unwrap();
        let page = transport().fetch(&url).await.unwrap();
        assert_eq!(page.status, 404);
    }

    #[tokio::test]
    async fn test_redirect_reports_final_url() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/old")
            .with_status(301)
            .with_header("location", "/new/")
            .create_async()
            .await;
        server
            .mock("GET", "/new/")
            .with_status(200)
            .with_body("moved")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/old", server.url())).unwrap();
        let page = transport().fetch(&url).await.unwrap();
        assert_eq!(page.final_url.path(), "/new/");
        assert_eq!(page.body, "moved");
    }

    #[tokio::test]
    async fn test_redirect_loop_is_an_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/loop")
            .with_status(302)
            .with_header("location", "/loop")
            .expect_at_least(1)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/loop", server.url())).unwrap();
        let err = transport().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::TooManyRedirects));
    }

    #[tokio::test]
    async fn test_refused_connection_is_an_error() {
        // Grab a free port, then close it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let err = transport().fetch(&url).await.unwrap_err();
        assert!(matches!(err, FetchError::Connect(_)));
    }
}
