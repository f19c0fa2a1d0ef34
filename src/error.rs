use thiserror::Error;

/// Error types for playlist scraping operations.
///
/// These cover the failures that can stop a step of the run: fetching the
/// page, reading a saved copy, loading configuration and writing the result.
/// A field that simply could not be found on the page is *not* an error; see
/// [`Miss`](crate::probe::Miss) for that case.
///
/// # Error Handling Examples
///
/// ```rust,no_run
/// use playlist_scraper::{DocumentSource, FileDocumentSource, ScrapeError};
///
/// # tokio_test::block_on(async {
/// let source = FileDocumentSource::new("saved_page.html");
///
/// match source.fetch("https://open.spotify.com/playlist/abc").await {
///     Ok(page) => println!("Loaded {} bytes", page.markup.len()),
///     Err(ScrapeError::Io(e)) => eprintln!("Could not read saved page: {}", e),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # });
/// ```
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// HTTP/network related errors.
    ///
    /// This includes connection failures, DNS errors, unexpected status codes
    /// and redirect loops.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The page did not arrive within the configured fetch timeout.
    #[error("Timed out after {seconds} seconds waiting for {url}")]
    Timeout {
        /// The URL being fetched
        url: String,
        /// The timeout that elapsed
        seconds: u64,
    },

    /// The playlist URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serializing the analysis record failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// File system I/O errors.
    ///
    /// This can occur when reading saved pages, writing analysis records or
    /// saving debug copies of fetched markup.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
