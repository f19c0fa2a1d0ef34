//! Data types for scraped playlist pages.
//!
//! This module contains the records produced by the extraction pipeline: the
//! playlist-level metadata, one record per track, and the analysis record
//! that is persisted and summarized at the end of a run.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder used for any text field that could not be extracted.
pub const UNKNOWN: &str = "Unknown";

/// Placeholder used for counters the page did not expose.
pub const NOT_AVAILABLE: &str = "N/A";

/// Duration reported when nothing usable was found.
pub const ZERO_DURATION: &str = "0:00";

/// Upper bound on the number of tracks kept per playlist.
pub const MAX_TRACKS: usize = 20;

// ================================================================================================
// PLAYLIST AND TRACK RECORDS
// ================================================================================================

/// Playlist-level metadata as shown in the page header.
///
/// Every field starts from a well-defined default and is only replaced when
/// one of the extraction probes produces an acceptable value.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::PlaylistMetadata;
///
/// let metadata = PlaylistMetadata::default();
/// assert_eq!(metadata.name, "Unknown");
/// assert_eq!(metadata.total_saves, "N/A");
/// assert_eq!(metadata.number_of_songs, 0);
/// assert_eq!(metadata.total_duration, "0:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistMetadata {
    /// The playlist title
    pub name: String,
    /// Free-text description, empty when none was found
    pub description: String,
    /// Save/like counter exactly as displayed (thousands separators kept)
    pub total_saves: String,
    /// Number of songs the page claims the playlist has
    pub number_of_songs: u64,
    /// Total duration as reported by the page (`H:MM:SS` or `M:SS`)
    pub total_duration: String,
    /// Total duration recomputed from the extracted tracks.
    ///
    /// Only present when the recomputation yields something other than
    /// `0:00`. It sits next to `total_duration` and never replaces it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calculated_duration: Option<String>,
}

impl Default for PlaylistMetadata {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            description: String::new(),
            total_saves: NOT_AVAILABLE.to_string(),
            number_of_songs: 0,
            total_duration: ZERO_DURATION.to_string(),
            calculated_duration: None,
        }
    }
}

/// One track row of a playlist.
///
/// Tracks keep the order in which they appear on the page; their position in
/// the surrounding `Vec` is the only ordering guarantee.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::Track;
///
/// let track = Track {
///     name: "Paranoid Android".to_string(),
///     album: "OK Computer".to_string(),
///     artists: vec!["Radiohead".to_string()],
///     duration: "6:23".to_string(),
///     ..Track::default()
/// };
///
/// assert_eq!(format!("{track}"), "Radiohead - Paranoid Android [OK Computer]");
/// assert_eq!(track.release_year, "Unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    /// The track title
    #[serde(rename = "track_name")]
    pub name: String,
    /// The album the track belongs to
    #[serde(rename = "album_name")]
    pub album: String,
    /// Date the track was added to the playlist (`YYYY-MM-DD` or `Unknown`)
    pub date_added: String,
    /// Track length as `M:SS`
    pub duration: String,
    /// Credited artists in page order
    pub artists: Vec<String>,
    /// Four-digit release year or `Unknown`
    pub release_year: String,
    /// Stream counter placeholder; pages do not expose it
    pub streams: String,
}

impl Default for Track {
    fn default() -> Self {
        Self {
            name: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            date_added: UNKNOWN.to_string(),
            duration: ZERO_DURATION.to_string(),
            artists: Vec::new(),
            release_year: UNKNOWN.to_string(),
            streams: NOT_AVAILABLE.to_string(),
        }
    }
}

impl Track {
    /// Artists joined for display, or `Unknown` when none were found.
    pub fn artist_list(&self) -> String {
        if self.artists.is_empty() {
            UNKNOWN.to_string()
        } else {
            self.artists.join(", ")
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.album == UNKNOWN {
            write!(f, "{} - {}", self.artist_list(), self.name)
        } else {
            write!(f, "{} - {} [{}]", self.artist_list(), self.name, self.album)
        }
    }
}

// ================================================================================================
// ANALYSIS RECORDS
// ================================================================================================

/// Discriminator stored in the `type` field of persisted records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Playlist,
}

/// The complete, normalized record for one scraped playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistAnalysis {
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// When the analysis was produced
    pub timestamp: DateTime<Local>,
    /// The playlist URL that was scraped
    pub url: String,
    /// Identifier taken from the URL, when it has one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub playlist_id: Option<String>,
    pub playlist_metadata: PlaylistMetadata,
    /// Number of entries in `tracks`
    pub tracks_analyzed: usize,
    pub tracks: Vec<Track>,
}

impl PlaylistAnalysis {
    /// Assemble an analysis record stamped with the current local time.
    pub fn new(
        url: impl Into<String>,
        playlist_id: Option<String>,
        playlist_metadata: PlaylistMetadata,
        tracks: Vec<Track>,
    ) -> Self {
        Self {
            kind: ResultKind::Playlist,
            timestamp: Local::now(),
            url: url.into(),
            playlist_id,
            playlist_metadata,
            tracks_analyzed: tracks.len(),
            tracks,
        }
    }
}

/// Result of a whole scrape as handed to callers.
///
/// Failures are reported as a value rather than an `Err` so the caller always
/// has something to print or persist. A failed outcome serializes as
/// `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisOutcome {
    Completed(PlaylistAnalysis),
    Failed { error: String },
}

impl AnalysisOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed { .. })
    }

    pub fn analysis(&self) -> Option<&PlaylistAnalysis> {
        match self {
            AnalysisOutcome::Completed(analysis) => Some(analysis),
            AnalysisOutcome::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Completed(_) => None,
            AnalysisOutcome::Failed { error } => Some(error),
        }
    }
}
