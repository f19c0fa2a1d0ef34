//! End-to-end playlist analysis.
//!
//! [`PlaylistAnalyzer`] ties the pieces together: acquire the page through a
//! [`DocumentSource`], run the [`PlaylistParser`] over it, recompute the
//! total duration from the extracted tracks and assemble the
//! [`PlaylistAnalysis`] record. Acquisition problems are reported and the run
//! carries on with whatever markup is available; only failures that leave
//! nothing to analyze surface as [`AnalysisOutcome::Failed`].

use crate::config::ScraperConfig;
use crate::duration::calculate_total_duration;
use crate::events::{EventSink, ExtractionEvent};
use crate::parsing::PlaylistParser;
use crate::persistence::AnalysisStore;
use crate::source::{DocumentSource, RawPage};
use crate::types::{AnalysisOutcome, PlaylistAnalysis, ZERO_DURATION};
use crate::{Result, ScrapeError};
use http_types::Url;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static PLAYLIST_PAGE_MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[data-testid='playlist-page']").unwrap());
static MAIN_CONTENT_MARKER: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("main").unwrap());

/// Runs the whole scrape for one playlist URL.
pub struct PlaylistAnalyzer {
    source: Box<dyn DocumentSource>,
    parser: PlaylistParser,
    config: ScraperConfig,
}

impl PlaylistAnalyzer {
    pub fn new(source: Box<dyn DocumentSource>, config: ScraperConfig) -> Self {
        Self {
            source,
            parser: PlaylistParser::with_max_tracks(config.max_tracks),
            config,
        }
    }

    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Analyze the playlist at `url`.
    ///
    /// Never returns an error: failures are folded into
    /// [`AnalysisOutcome::Failed`] so the caller always has a value to
    /// report.
    pub async fn analyze_playlist(&self, url: &str, sink: &dyn EventSink) -> AnalysisOutcome {
        log::info!("Starting analysis of playlist: {url}");

        match self.try_analyze(url, sink).await {
            Ok(analysis) => AnalysisOutcome::Completed(analysis),
            Err(e) => {
                log::error!("Analysis of {url} failed: {e}");
                AnalysisOutcome::Failed {
                    error: e.to_string(),
                }
            }
        }
    }

    async fn try_analyze(&self, url: &str, sink: &dyn EventSink) -> Result<PlaylistAnalysis> {
        url.parse::<Url>()
            .map_err(|e| ScrapeError::InvalidUrl(format!("{url}: {e}")))?;

        let page = self.acquire(url, sink).await;

        if self.config.save_debug_html && !page.markup.is_empty() {
            let store = AnalysisStore::new(&self.config.results_dir);
            if let Err(e) = store.save_debug_html(&page.markup) {
                log::warn!("Could not save debug HTML: {e}");
            }
        }

        let settle_delay = self.config.settle_delay();
        if !settle_delay.is_zero() {
            log::debug!("Waiting {settle_delay:?} before extraction");
            tokio::time::sleep(settle_delay).await;
        }

        Ok(self.analyze_document(url, &page.markup, sink))
    }

    /// Fetch the page, degrading to an empty one when acquisition fails.
    async fn acquire(&self, url: &str, sink: &dyn EventSink) -> RawPage {
        match self.source.fetch(url).await {
            Ok(page) => {
                if !page.is_success() {
                    sink.emit(ExtractionEvent::AcquisitionProblem {
                        url: url.to_string(),
                        message: format!("page answered with HTTP status {}", page.status),
                    });
                }
                page
            }
            Err(e) => {
                sink.emit(ExtractionEvent::AcquisitionProblem {
                    url: url.to_string(),
                    message: e.to_string(),
                });
                RawPage::empty(url)
            }
        }
    }

    /// Run extraction over already-acquired markup.
    ///
    /// The calculated duration is attached next to the page-reported total
    /// whenever it is not `0:00`.
    pub fn analyze_document(
        &self,
        url: &str,
        markup: &str,
        sink: &dyn EventSink,
    ) -> PlaylistAnalysis {
        let document = Html::parse_document(markup);
        check_page_structure(url, &document, sink);

        let scraped = self.parser.parse_playlist(&document, markup, sink);
        let mut metadata = scraped.metadata;

        if !scraped.tracks.is_empty() {
            let calculated = calculate_total_duration(&scraped.tracks);
            if calculated != ZERO_DURATION {
                metadata.calculated_duration = Some(calculated);
            }
        }

        PlaylistAnalysis::new(url, extract_playlist_id(url), metadata, scraped.tracks)
    }
}

/// Warn when the page lacks both the playlist container and a main element.
fn check_page_structure(url: &str, document: &Html, sink: &dyn EventSink) {
    if document.select(&PLAYLIST_PAGE_MARKER).next().is_some() {
        log::debug!("Playlist page detected");
    } else if document.select(&MAIN_CONTENT_MARKER).next().is_some() {
        log::debug!("Playlist page marker not found, main content detected");
    } else {
        sink.emit(ExtractionEvent::AcquisitionProblem {
            url: url.to_string(),
            message: "could not detect page structure".to_string(),
        });
    }
}

/// The playlist identifier embedded in a playlist URL.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::extract_playlist_id;
///
/// assert_eq!(
///     extract_playlist_id("https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd?si=abc"),
///     Some("37i9dQZF1DX0XUsuxWHRQd".to_string())
/// );
/// assert_eq!(extract_playlist_id("https://open.spotify.com/album/xyz"), None);
/// ```
pub fn extract_playlist_id(url: &str) -> Option<String> {
    let (_, rest) = url.split_once("playlist/")?;
    let id = rest.split(['?', '#', '/']).next().unwrap_or_default();
    (!id.is_empty()).then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingSink;

    #[test]
    fn playlist_id_handles_suffixes() {
        assert_eq!(
            extract_playlist_id("https://open.spotify.com/playlist/abc123"),
            Some("abc123".to_string())
        );
        assert_eq!(
            extract_playlist_id("https://open.spotify.com/playlist/abc123#tracks"),
            Some("abc123".to_string())
        );
        assert_eq!(extract_playlist_id("https://open.spotify.com/playlist/"), None);
        assert_eq!(extract_playlist_id("https://example.com"), None);
    }

    #[test]
    fn missing_structure_is_reported() {
        let sink = RecordingSink::new();
        let document = Html::parse_document("<html><body><div></div></body></html>");
        check_page_structure("https://example.com", &document, &sink);
        assert!(matches!(
            sink.events().as_slice(),
            [ExtractionEvent::AcquisitionProblem { .. }]
        ));

        let sink = RecordingSink::new();
        let document = Html::parse_document("<html><body><main></main></body></html>");
        check_page_structure("https://example.com", &document, &sink);
        assert!(sink.events().is_empty());
    }
}
