//! Extract playlist metadata and track listings from rendered playlist pages.
//!
//! Playlist pages do not promise stable markup, so every field is resolved by
//! an ordered list of probes (CSS selectors, then regular expressions over the
//! page text or raw markup, then JSON fragments embedded in the page). The
//! first probe that yields an acceptable value wins; when none does, the
//! field keeps a well-defined default.
//!
//! ```rust,no_run
//! use playlist_scraper::{
//!     events::LogSink, render_summary, FileDocumentSource, PlaylistAnalyzer, ScraperConfig,
//! };
//!
//! # tokio_test::block_on(async {
//! let source = FileDocumentSource::new("SpotifyData/debug_page_1700000000.html");
//! let analyzer = PlaylistAnalyzer::new(Box::new(source), ScraperConfig::default());
//!
//! let outcome = analyzer
//!     .analyze_playlist("https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd", &LogSink)
//!     .await;
//! print!("{}", render_summary(&outcome));
//! # });
//! ```

pub mod analyzer;
pub mod config;
pub mod dates;
pub mod duration;
pub mod error;
pub mod events;
pub mod parsing;
pub mod persistence;
pub mod probe;
pub mod source;
pub mod summary;
pub mod types;

pub use analyzer::{extract_playlist_id, PlaylistAnalyzer};
pub use crate::config::ScraperConfig;
pub use error::ScrapeError;
pub use events::{EventSink, ExtractionEvent, LogSink};
pub use parsing::{PageSequences, PlaylistParser, ScrapedPlaylist};
pub use persistence::AnalysisStore;
pub use source::{DocumentSource, FileDocumentSource, HttpDocumentSource, RawPage};
pub use summary::{render_summary, Summary};
pub use types::{AnalysisOutcome, PlaylistAnalysis, PlaylistMetadata, ResultKind, Track};

#[cfg(feature = "mock")]
pub use source::MockDocumentSource;

// Re-export scraper types for testing
pub use scraper::Html;

pub type Result<T> = std::result::Result<T, ScrapeError>;
