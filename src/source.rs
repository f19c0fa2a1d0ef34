//! Page acquisition.
//!
//! The extraction pipeline only needs the rendered markup of a playlist page.
//! [`DocumentSource`] abstracts where that markup comes from: a plain HTTP
//! fetch ([`HttpDocumentSource`]) or a page saved to disk earlier
//! ([`FileDocumentSource`]).

use crate::config::ScraperConfig;
use crate::{Result, ScrapeError};
use async_trait::async_trait;
use http_client::{HttpClient, Request, Response};
use http_types::{Method, Url};
use std::path::PathBuf;
use std::time::Duration;

/// Maximum number of redirects followed for a single fetch.
pub const MAX_REDIRECTS: u32 = 5;

/// Markup of one acquired page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPage {
    /// The URL the markup was finally served from
    pub url: String,
    /// HTTP status of the final response; `200` for saved pages
    pub status: u16,
    pub markup: String,
}

impl RawPage {
    /// A page with no content, used when acquisition failed outright.
    pub fn empty(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status: 0,
            markup: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Source of rendered playlist pages.
///
/// # Mocking Support
///
/// When the `mock` feature is enabled, this crate provides
/// `MockDocumentSource` generated by `mockall`.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait(?Send)]
pub trait DocumentSource {
    /// Acquire the markup for `url`.
    async fn fetch(&self, url: &str) -> Result<RawPage>;
}

// ================================================================================================
// HTTP
// ================================================================================================

/// Fetches pages over HTTP with browser-like request headers.
///
/// Redirects are followed manually (up to [`MAX_REDIRECTS`]) and the whole
/// exchange is bounded by the configured fetch timeout. Non-success statuses
/// are returned as pages, not errors; the caller decides what to do with
/// them.
pub struct HttpDocumentSource {
    client: Box<dyn HttpClient>,
    user_agent: String,
    timeout: Duration,
}

impl HttpDocumentSource {
    pub fn new(client: Box<dyn HttpClient>, config: &ScraperConfig) -> Self {
        Self {
            client,
            user_agent: config.user_agent.clone(),
            timeout: config.fetch_timeout(),
        }
    }

    fn build_request(&self, url: Url) -> Request {
        let mut request = Request::new(Method::Get, url);
        request.insert_header("User-Agent", self.user_agent.as_str());
        request.insert_header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8");
        request.insert_header("Accept-Language", "en-US,en;q=0.9");
        request.insert_header("DNT", "1");
        request.insert_header("Connection", "keep-alive");
        request.insert_header("Upgrade-Insecure-Requests", "1");
        request
    }

    async fn fetch_following_redirects(&self, url: &str) -> Result<RawPage> {
        let mut current = url
            .parse::<Url>()
            .map_err(|e| ScrapeError::InvalidUrl(format!("{url}: {e}")))?;

        for redirect_count in 0..=MAX_REDIRECTS {
            let mut response = self
                .client
                .send(self.build_request(current.clone()))
                .await
                .map_err(|e| ScrapeError::Http(e.to_string()))?;

            log::debug!("GET {current} -> {}", response.status());

            if let Some(location) = redirect_location(&response) {
                if redirect_count == MAX_REDIRECTS {
                    break;
                }
                let next = current.join(&location).map_err(|e| {
                    ScrapeError::Http(format!("Invalid redirect location '{location}': {e}"))
                })?;
                log::debug!("Following redirect from {current} to {next}");
                current = next;
                continue;
            }

            let status = u16::from(response.status());
            let markup = response
                .body_string()
                .await
                .map_err(|e| ScrapeError::Http(e.to_string()))?;

            return Ok(RawPage {
                url: current.to_string(),
                status,
                markup,
            });
        }

        Err(ScrapeError::Http("Too many redirects".to_string()))
    }
}

#[async_trait(?Send)]
impl DocumentSource for HttpDocumentSource {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        match tokio::time::timeout(self.timeout, self.fetch_following_redirects(url)).await {
            Ok(result) => result,
            Err(_) => Err(ScrapeError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }),
        }
    }
}

fn redirect_location(response: &Response) -> Option<String> {
    let status = response.status();
    if !(status == 301 || status == 302 || status == 303 || status == 307 || status == 308) {
        return None;
    }
    response
        .header("location")
        .and_then(|values| values.get(0))
        .map(|value| value.as_str().to_string())
}

// ================================================================================================
// SAVED PAGES
// ================================================================================================

/// Reads a page that was saved to disk, ignoring the requested URL.
///
/// Useful for re-running extraction against a debug copy written by an
/// earlier run.
#[derive(Debug, Clone)]
pub struct FileDocumentSource {
    path: PathBuf,
}

impl FileDocumentSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait(?Send)]
impl DocumentSource for FileDocumentSource {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        log::debug!("Reading saved page for {url} from {}", self.path.display());
        let markup = std::fs::read_to_string(&self.path)?;
        Ok(RawPage {
            url: url.to_string(),
            status: 200,
            markup,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_client::Error;
    use http_client::http_types::StatusCode;
    use std::sync::Mutex;

    /// Replays canned responses in order.
    #[derive(Debug, Default)]
    struct CannedClient {
        responses: Mutex<Vec<(u16, Option<&'static str>, &'static str)>>,
    }

    impl CannedClient {
        fn new(mut responses: Vec<(u16, Option<&'static str>, &'static str)>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
            }
        }
    }

    #[http_client::async_trait]
    impl HttpClient for CannedClient {
        async fn send(&self, req: Request) -> std::result::Result<Response, Error> {
            log::trace!("canned response for {}", req.url());
            let Some((status, location, body)) = self.responses.lock().unwrap().pop() else {
                return Err(Error::from_str(
                    StatusCode::BadGateway,
                    "no canned response left",
                ));
            };
            let mut response = Response::new(status);
            if let Some(location) = location {
                response.insert_header("location", location);
            }
            response.set_body(body);
            Ok(response)
        }
    }

    fn source(client: CannedClient) -> HttpDocumentSource {
        HttpDocumentSource::new(Box::new(client), &ScraperConfig::default())
    }

    #[tokio::test]
    async fn returns_markup_of_successful_response() {
        let source = source(CannedClient::new(vec![(200, None, "<html>ok</html>")]));
        let page = source
            .fetch("https://open.spotify.com/playlist/abc")
            .await
            .unwrap();
        assert!(page.is_success());
        assert_eq!(page.markup, "<html>ok</html>");
    }

    #[tokio::test]
    async fn follows_relative_redirects() {
        let source = source(CannedClient::new(vec![
            (302, Some("/intl-de/playlist/abc"), ""),
            (200, None, "<main></main>"),
        ]));
        let page = source
            .fetch("https://open.spotify.com/playlist/abc")
            .await
            .unwrap();
        assert_eq!(page.url, "https://open.spotify.com/intl-de/playlist/abc");
        assert_eq!(page.markup, "<main></main>");
    }

    #[tokio::test]
    async fn gives_up_after_too_many_redirects() {
        let responses = (0..=MAX_REDIRECTS)
            .map(|_| (302, Some("/loop"), ""))
            .collect::<Vec<_>>();
        let source = source(CannedClient::new(responses));
        let err = source.fetch("https://example.com/start").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Http(msg) if msg.contains("redirects")));
    }

    #[tokio::test]
    async fn error_status_is_returned_as_page() {
        let source = source(CannedClient::new(vec![(404, None, "not here")]));
        let page = source.fetch("https://example.com/playlist/x").await.unwrap();
        assert_eq!(page.status, 404);
        assert!(!page.is_success());
    }

    #[tokio::test]
    async fn rejects_unparseable_url() {
        let source = source(CannedClient::new(Vec::new()));
        let err = source.fetch("not a url").await.unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let source = FileDocumentSource::new("/nonexistent/playlist-page.html");
        let err = source.fetch("https://example.com").await.unwrap_err();
        assert!(matches!(err, ScrapeError::Io(_)));
    }
}
