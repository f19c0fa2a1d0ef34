//! Track and playlist duration helpers.
//!
//! Durations move through the pipeline as display strings (`M:SS` for tracks,
//! `H:MM:SS` or `M:SS` for playlists) because that is how pages show them.
//! These helpers convert between those strings, raw millisecond values and
//! second counts.

use crate::types::{Track, ZERO_DURATION};

/// Format a millisecond count as `M:SS`.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::duration::format_duration;
///
/// assert_eq!(format_duration(225_000), "3:45");
/// assert_eq!(format_duration(59_999), "0:59");
/// assert_eq!(format_duration(0), "0:00");
/// ```
pub fn format_duration(duration_ms: u64) -> String {
    let seconds = duration_ms / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Format a millisecond count captured as text.
///
/// Anything that is not a non-negative integer becomes `0:00`.
pub fn format_duration_text(duration_ms: &str) -> String {
    match duration_ms.trim().parse::<u64>() {
        Ok(ms) => format_duration(ms),
        Err(_) => {
            log::debug!("Unusable millisecond value '{duration_ms}'");
            ZERO_DURATION.to_string()
        }
    }
}

/// Parse a `minutes:seconds` string into a number of seconds.
///
/// Only the exact two-part integer shape is accepted; everything else,
/// including values too large to count, is zero.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::duration::parse_duration_text;
///
/// assert_eq!(parse_duration_text("3:45"), 225);
/// assert_eq!(parse_duration_text("1:02:03"), 0);
/// assert_eq!(parse_duration_text("abc"), 0);
/// ```
pub fn parse_duration_text(duration_text: &str) -> u64 {
    let Some((minutes, seconds)) = duration_text.split_once(':') else {
        return 0;
    };
    match (minutes.parse::<u64>(), seconds.parse::<u64>()) {
        (Ok(minutes), Ok(seconds)) => minutes
            .checked_mul(60)
            .and_then(|total| total.checked_add(seconds))
            .unwrap_or(0),
        _ => 0,
    }
}

/// Render a second count as `H:MM:SS` when it reaches an hour, else `M:SS`.
pub fn format_seconds(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}

/// Sum the durations of the given tracks.
///
/// Tracks whose duration is not a plain `M:SS` value contribute nothing.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::{duration::calculate_total_duration, Track};
///
/// let tracks: Vec<Track> = ["3:30", "2:15", "0:00"]
///     .iter()
///     .map(|d| Track { duration: d.to_string(), ..Track::default() })
///     .collect();
///
/// assert_eq!(calculate_total_duration(&tracks), "5:45");
/// ```
pub fn calculate_total_duration(tracks: &[Track]) -> String {
    let total_seconds = tracks
        .iter()
        .map(|track| parse_duration_text(&track.duration))
        .fold(0u64, u64::saturating_add);
    format_seconds(total_seconds)
}

/// Textual shape of a playlist's total running time.
///
/// The variants correspond to the labels playlist headers use, such as
/// `2 hr 15 min`, `45 min 12 sec` or `52 min`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DurationTemplate {
    HoursMinutes,
    MinutesSeconds,
    Minutes,
}

impl DurationTemplate {
    /// Synthesize the display string from the captured numbers.
    ///
    /// `second` is ignored for [`DurationTemplate::Minutes`].
    pub fn render(self, first: u64, second: u64) -> String {
        match self {
            DurationTemplate::HoursMinutes => format!("{first}:{second:02}:00"),
            DurationTemplate::MinutesSeconds => format!("{first}:{second:02}"),
            DurationTemplate::Minutes => format!("0:{first:02}:00"),
        }
    }
}
