//! HTML parsing for playlist pages.
//!
//! This module contains all the extraction logic that turns a rendered
//! playlist page into [`PlaylistMetadata`] and [`Track`] records. Playlist
//! markup is not stable, so every field is described by an ordered table of
//! [`Probe`]s and resolved through the shared fallback routines in
//! [`crate::probe`].
//!
//! Page-wide sequences (durations, release years, dates added) are collected
//! independently of the track rows and zipped onto them **by position**. The
//! pages carry no per-track key to join on, so when the two sides disagree on
//! how many tracks there are, values can land on the wrong track.

use crate::dates::{get_release_year, parse_date_added};
use crate::duration::{format_duration_text, DurationTemplate};
use crate::events::{EventSink, ExtractionEvent, Field, Sequence};
use crate::probe::{
    first_match, first_non_empty, first_selection, Match, Miss, Probe, ProbeContext, Resolved,
    Take, Target,
};
use crate::types::{PlaylistMetadata, Track, MAX_TRACKS, NOT_AVAILABLE, UNKNOWN, ZERO_DURATION};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

// ================================================================================================
// PROBE TABLES
// ================================================================================================

static NAME_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#"h1[data-testid="entityTitle"]"#,
        "h1.Type__TypeElement-sc-goli3j-0",
        r#"h1[data-encore-id="type"]"#,
        "h1.encore-text",
        r#"span[data-testid="entityTitle"]"#,
        "h1",
        ".main-entityHeader-title",
        r#"[data-testid="entityTitle"]"#,
    ]
    .into_iter()
    .map(Probe::selector)
    .collect()
});

static DESCRIPTION_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#"[data-testid="description"]"#,
        r#"span[data-testid="description"]"#,
        ".Type__TypeElement-sc-goli3j-0.fZDcWX",
        r#"span[data-encore-id="text"].Type__TypeElement-sc-goli3j-0"#,
        ".main-entityHeader-subtitle",
        r#"div[data-testid="playlist-description"]"#,
        r#"p[data-encore-id="text"]"#,
        r#"[data-testid="entitySubtitle"]"#,
        ".main-entityHeader-subtitle span",
    ]
    .into_iter()
    .map(Probe::selector)
    .collect()
});

static DESCRIPTION_JSON_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [r#""description":\s*"([^"]+)""#, r#""subtitle":\s*"([^"]+)""#]
        .into_iter()
        .map(|pattern| Probe::pattern(pattern, Target::Markup, Take::Every))
        .collect()
});

static SAVES_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r"(?i)(\d{1,3}(?:,\d{3})*)\s+saves?",
        r"(?i)(\d{1,3}(?:,\d{3})*)\s+likes?",
        r"(?i)(\d+)\s+saves?",
        r"(?i)(\d+)\s+likes?",
        r#"(?i)"followers":\s*\{\s*"total":\s*(\d+)"#,
        r"(?i)follower.*?(\d{1,3}(?:,\d{3})*)",
        r"(?i)save.*?(\d{1,3}(?:,\d{3})*)",
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::PageTextThenMarkup, Take::First))
    .collect()
});

static SONG_COUNT_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r"(?i)(\d{1,3}(?:,\d{3})*)\s+songs?",
        r"(?i)(\d+)\s+songs?",
        r"(?i)(\d{1,3}(?:,\d{3})*)\s+tracks?",
        r"(?i)(\d+)\s+tracks?",
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::PageText, Take::First))
    .collect()
});

/// Total running time labels, most specific first.
static TOTAL_DURATION_TEMPLATES: [(&str, DurationTemplate); 6] = [
    (r"(?i)(\d+)\s+hr\s+(\d+)\s+min", DurationTemplate::HoursMinutes),
    (
        r"(?i)(\d+)\s+hours?\s+(\d+)\s+minutes?",
        DurationTemplate::HoursMinutes,
    ),
    (r"(?i)(\d+)\s+min\s+(\d+)\s+sec", DurationTemplate::MinutesSeconds),
    (
        r"(?i)(\d+)\s+minutes?\s+(\d+)\s+seconds?",
        DurationTemplate::MinutesSeconds,
    ),
    (r"(?i)(\d+)\s+min", DurationTemplate::Minutes),
    (r"(?i)(\d+)\s+minutes?", DurationTemplate::Minutes),
];

static TOTAL_DURATION_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    TOTAL_DURATION_TEMPLATES
        .iter()
        .map(|&(pattern, _)| Probe::pattern(pattern, Target::PageText, Take::First))
        .collect()
});

/// The first pattern yields `M:SS` text; the others carry milliseconds.
static DURATION_SEQUENCE_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r"(\d+:\d{2})",
        r#""duration_ms":(\d+)"#,
        r#""duration":\s*(\d+)"#,
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::Markup, Take::Every))
    .collect()
});

static RELEASE_DATE_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#""album":\s*\{[^}]*"release_date":\s*"([^"]+)""#,
        r#""release_date":\s*"([^"]+)""#,
        r#""releaseDate":\s*"([^"]+)""#,
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::Markup, Take::Every))
    .collect()
});

static DATE_ADDED_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#""added_at":\s*"([^"]+)""#,
        r#""addedAt":\s*"([^"]+)""#,
        r#""dateAdded":\s*"([^"]+)""#,
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::Markup, Take::Every))
    .collect()
});

static ROW_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#"[data-testid="tracklist-row"]"#,
        r#"[data-testid="track-row"]"#,
        r#"div[role="row"]"#,
    ]
    .into_iter()
    .map(Probe::selector_all)
    .collect()
});

static TRACK_NAME_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#"[data-testid="internal-track-link"]"#,
        r#"a[href*="/track/"]"#,
        r#"div[data-testid="internal-track-link"]"#,
    ]
    .into_iter()
    .map(Probe::selector)
    .collect()
});

static ARTIST_PROBES: LazyLock<Vec<Probe>> =
    LazyLock::new(|| vec![Probe::selector_all(r#"a[href*="/artist/"]"#)]);

static ALBUM_PROBES: LazyLock<Vec<Probe>> =
    LazyLock::new(|| vec![Probe::selector(r#"a[href*="/album/"]"#)]);

static ROW_DURATION_PROBES: LazyLock<Vec<Probe>> =
    LazyLock::new(|| vec![Probe::pattern(r"\d+:\d{2}", Target::TextNodes, Take::First)]);

static ROW_DATE_PROBES: LazyLock<Vec<Probe>> =
    LazyLock::new(|| vec![Probe::attribute("time", "datetime")]);

/// Embedded track objects, progressively looser. Group 1 is the track name,
/// group 2 the raw artists array and group 3 (when present) the album name.
static EMBEDDED_TRACK_PROBES: LazyLock<Vec<Probe>> = LazyLock::new(|| {
    [
        r#""track":\s*\{[^}]*"name":\s*"([^"]+)"[^}]*"artists":\s*\[([^\]]+)\][^}]*"album":\s*\{[^}]*"name":\s*"([^"]+)""#,
        r#""name":\s*"([^"]+)"[^}]*"artists":\s*\[([^\]]+)\]"#,
        r#"\{"name":"([^"]+)".*?"artists":\[([^\]]+)\].*?"album":\{"name":"([^"]+)""#,
    ]
    .into_iter()
    .map(|pattern| Probe::pattern(pattern, Target::Markup, Take::Every))
    .collect()
});

static EMBEDDED_ARTIST_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""name":\s*"([^"]+)""#).unwrap());

/// Titles that belong to the site chrome rather than the playlist.
const NAME_DENYLIST: [&str; 2] = ["Your Library", "Spotify"];

/// Header texts that are not descriptions.
const DESCRIPTION_DENYLIST: [&str; 3] = ["Made for you", "By Spotify", "Spotify"];

// ================================================================================================
// RESULTS
// ================================================================================================

/// Page-wide sequences that are zipped onto track rows by index.
///
/// Entry `i` of each sequence is assumed to belong to track `i`. Nothing
/// checks that assumption; a missing entry only means the track falls back
/// to a row-local value or its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageSequences {
    pub durations: Vec<String>,
    pub release_years: Vec<String>,
    pub dates_added: Vec<String>,
}

impl PageSequences {
    pub fn duration(&self, index: usize) -> Option<&str> {
        self.durations.get(index).map(String::as_str)
    }

    pub fn release_year(&self, index: usize) -> Option<&str> {
        self.release_years.get(index).map(String::as_str)
    }

    pub fn date_added(&self, index: usize) -> Option<&str> {
        self.dates_added.get(index).map(String::as_str)
    }
}

/// Everything extracted from one playlist page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedPlaylist {
    pub metadata: PlaylistMetadata,
    pub tracks: Vec<Track>,
}

// ================================================================================================
// PARSER
// ================================================================================================

/// Parser for rendered playlist pages.
///
/// The parser is stateless apart from the track limit and never fails: any
/// field it cannot find keeps its default, and every decision is reported to
/// the [`EventSink`] passed in.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::{events::RecordingSink, Html, PlaylistParser};
///
/// let markup = r#"<html><body>
///     <h1 data-testid="entityTitle">Morning Coffee</h1>
///     <span>24 songs, 1 hr 12 min</span>
/// </body></html>"#;
/// let document = Html::parse_document(markup);
///
/// let playlist = PlaylistParser::new().parse_playlist(&document, markup, &RecordingSink::new());
///
/// assert_eq!(playlist.metadata.name, "Morning Coffee");
/// assert_eq!(playlist.metadata.number_of_songs, 24);
/// assert_eq!(playlist.metadata.total_duration, "1:12:00");
/// assert!(playlist.tracks.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct PlaylistParser {
    max_tracks: usize,
}

impl PlaylistParser {
    /// Create a parser keeping up to [`MAX_TRACKS`] tracks.
    pub fn new() -> Self {
        Self {
            max_tracks: MAX_TRACKS,
        }
    }

    /// Create a parser keeping fewer tracks. Limits above [`MAX_TRACKS`] are
    /// clamped.
    pub fn with_max_tracks(max_tracks: usize) -> Self {
        Self {
            max_tracks: max_tracks.min(MAX_TRACKS),
        }
    }

    pub fn max_tracks(&self) -> usize {
        self.max_tracks
    }

    /// Extract metadata and tracks from a rendered page.
    pub fn parse_playlist(
        &self,
        document: &Html,
        markup: &str,
        sink: &dyn EventSink,
    ) -> ScrapedPlaylist {
        let context = ProbeContext::document(document, markup);

        let metadata = self.extract_playlist_metadata(&context, sink);
        let sequences = self.extract_page_sequences(&context, sink);
        let tracks = self.extract_tracks(&context, &sequences, sink);

        ScrapedPlaylist { metadata, tracks }
    }

    // === PLAYLIST METADATA ===

    /// Resolve every playlist-level field, keeping defaults for misses.
    pub fn extract_playlist_metadata(
        &self,
        context: &ProbeContext<'_>,
        sink: &dyn EventSink,
    ) -> PlaylistMetadata {
        let defaults = PlaylistMetadata::default();

        let name = settle(
            Field::Name,
            self.extract_name(context),
            defaults.name,
            sink,
            String::clone,
        );
        let description = settle(
            Field::Description,
            self.extract_description(context, &name),
            defaults.description,
            sink,
            String::clone,
        );
        let total_saves = settle(
            Field::TotalSaves,
            self.extract_total_saves(context),
            defaults.total_saves,
            sink,
            String::clone,
        );
        let number_of_songs = settle(
            Field::NumberOfSongs,
            self.extract_number_of_songs(context),
            defaults.number_of_songs,
            sink,
            u64::to_string,
        );
        let total_duration = settle(
            Field::TotalDuration,
            self.extract_total_duration(context),
            defaults.total_duration,
            sink,
            String::clone,
        );

        PlaylistMetadata {
            name,
            description,
            total_saves,
            number_of_songs,
            total_duration,
            calculated_duration: None,
        }
    }

    /// Playlist title from the page header.
    pub fn extract_name(&self, context: &ProbeContext<'_>) -> Result<Resolved<String>, Miss> {
        first_match(&NAME_PROBES, context, |candidate, _| {
            is_acceptable_name(&candidate.text).then(|| candidate.text.clone())
        })
    }

    /// Playlist description from the header, then from embedded JSON.
    ///
    /// `name` is the already resolved playlist title, which is never accepted
    /// as a description.
    pub fn extract_description(
        &self,
        context: &ProbeContext<'_>,
        name: &str,
    ) -> Result<Resolved<String>, Miss> {
        first_match(&DESCRIPTION_PROBES, context, |candidate, _| {
            is_acceptable_description(&candidate.text, name).then(|| candidate.text.clone())
        })
        .or_else(|_| {
            first_match(&DESCRIPTION_JSON_PROBES, context, |candidate, _| {
                let description = decode_json_string(&candidate.text);
                is_acceptable_json_description(&description, name).then_some(description)
            })
        })
        .map_err(|_| Miss {
            probes_tried: DESCRIPTION_PROBES.len() + DESCRIPTION_JSON_PROBES.len(),
        })
    }

    /// Save/like counter, kept exactly as displayed.
    pub fn extract_total_saves(&self, context: &ProbeContext<'_>) -> Result<Resolved<String>, Miss> {
        first_match(&SAVES_PROBES, context, |candidate, _| {
            parse_grouped_number(&candidate.text).map(|_| candidate.text.clone())
        })
    }

    /// Number of songs the header claims.
    pub fn extract_number_of_songs(
        &self,
        context: &ProbeContext<'_>,
    ) -> Result<Resolved<u64>, Miss> {
        first_match(&SONG_COUNT_PROBES, context, |candidate, _| {
            parse_grouped_number(&candidate.text)
        })
    }

    /// Total running time from the header text.
    pub fn extract_total_duration(
        &self,
        context: &ProbeContext<'_>,
    ) -> Result<Resolved<String>, Miss> {
        first_match(&TOTAL_DURATION_PROBES, context, |candidate, index| {
            let &(_, template) = TOTAL_DURATION_TEMPLATES.get(index)?;
            let first = candidate.group(1)?.parse::<u64>().ok()?;
            let second = match template {
                DurationTemplate::Minutes => 0,
                _ => candidate.group(2)?.parse::<u64>().ok()?,
            };
            Some(template.render(first, second))
        })
    }

    // === PAGE-WIDE SEQUENCES ===

    /// Collect durations, release years and dates added from the markup.
    pub fn extract_page_sequences(
        &self,
        context: &ProbeContext<'_>,
        sink: &dyn EventSink,
    ) -> PageSequences {
        PageSequences {
            durations: self.extract_durations(context, sink),
            release_years: self.extract_release_years(context, sink),
            dates_added: self.extract_dates_added(context, sink),
        }
    }

    /// Track durations in document order.
    ///
    /// Plain `M:SS` text wins over millisecond fields; millisecond values are
    /// converted, with unusable values becoming `0:00`.
    pub fn extract_durations(&self, context: &ProbeContext<'_>, sink: &dyn EventSink) -> Vec<String> {
        let durations = match first_non_empty(&DURATION_SEQUENCE_PROBES, context) {
            Ok(resolved) => {
                let is_text = resolved.probe == DURATION_SEQUENCE_PROBES[0].label();
                let values = resolved
                    .value
                    .iter()
                    .map(|candidate| {
                        if is_text {
                            candidate.text.clone()
                        } else {
                            format_duration_text(&candidate.text)
                        }
                    })
                    .collect::<Vec<_>>();
                Some((resolved.probe, values))
            }
            Err(_) => None,
        };
        report_sequence(Sequence::Durations, durations, sink)
    }

    /// Release years in document order.
    pub fn extract_release_years(
        &self,
        context: &ProbeContext<'_>,
        sink: &dyn EventSink,
    ) -> Vec<String> {
        let years = first_non_empty(&RELEASE_DATE_PROBES, context)
            .ok()
            .map(|resolved| {
                let values = resolved
                    .value
                    .iter()
                    .map(|candidate| get_release_year(Some(&candidate.text)))
                    .collect::<Vec<_>>();
                (resolved.probe, values)
            });
        report_sequence(Sequence::ReleaseYears, years, sink)
    }

    /// Dates tracks were added, in document order.
    pub fn extract_dates_added(
        &self,
        context: &ProbeContext<'_>,
        sink: &dyn EventSink,
    ) -> Vec<String> {
        let dates = first_non_empty(&DATE_ADDED_PROBES, context)
            .ok()
            .map(|resolved| {
                let values = resolved
                    .value
                    .iter()
                    .map(|candidate| parse_date_added(Some(&candidate.text)))
                    .collect::<Vec<_>>();
                (resolved.probe, values)
            });
        report_sequence(Sequence::DatesAdded, dates, sink)
    }

    // === TRACKS ===

    /// Extract tracks from structural rows, falling back to embedded JSON
    /// when the page has no recognizable rows.
    pub fn extract_tracks(
        &self,
        context: &ProbeContext<'_>,
        sequences: &PageSequences,
        sink: &dyn EventSink,
    ) -> Vec<Track> {
        let rows = match first_selection(&ROW_PROBES, context) {
            Ok(rows) => rows,
            Err(_) => {
                log::debug!("No track rows found with standard selectors, trying JSON extraction");
                return self.extract_tracks_from_json(context, sequences, sink);
            }
        };

        sink.emit(ExtractionEvent::RowsLocated {
            selector: rows.probe.to_string(),
            count: rows.value.len(),
        });

        rows.value
            .into_iter()
            .take(self.max_tracks)
            .enumerate()
            .map(|(index, row)| self.parse_track_row(row, index, sequences, sink))
            .collect()
    }

    /// Build one track from a structural row.
    ///
    /// Sub-fields that cannot be found keep their defaults; the row itself is
    /// always returned.
    pub fn parse_track_row(
        &self,
        row: ElementRef<'_>,
        index: usize,
        sequences: &PageSequences,
        sink: &dyn EventSink,
    ) -> Track {
        let context = ProbeContext::row(row);
        let defaults = Track::default();
        let mut missing = Vec::new();

        let name = first_match(&TRACK_NAME_PROBES, &context, non_empty_text)
            .map(|resolved| resolved.value)
            .unwrap_or_else(|_| {
                missing.push(Field::TrackName);
                defaults.name.clone()
            });

        let artists: Vec<String> = ARTIST_PROBES
            .iter()
            .flat_map(|probe| probe.candidates(&context))
            .map(|candidate| candidate.text)
            .filter(|text| !text.is_empty())
            .collect();
        if artists.is_empty() {
            missing.push(Field::Artists);
        }

        let album = first_match(&ALBUM_PROBES, &context, non_empty_text)
            .map(|resolved| resolved.value)
            .unwrap_or_else(|_| {
                missing.push(Field::Album);
                defaults.album.clone()
            });

        let duration = sequences
            .duration(index)
            .filter(|duration| *duration != ZERO_DURATION)
            .map(str::to_string)
            .or_else(|| {
                first_match(&ROW_DURATION_PROBES, &context, non_empty_text)
                    .ok()
                    .map(|resolved| resolved.value)
            })
            .unwrap_or_else(|| {
                missing.push(Field::Duration);
                defaults.duration.clone()
            });

        let date_added = sequences
            .date_added(index)
            .filter(|date| *date != UNKNOWN)
            .map(str::to_string)
            .or_else(|| {
                first_match(&ROW_DATE_PROBES, &context, |candidate, _| {
                    Some(parse_date_added(Some(&candidate.text)))
                })
                .ok()
                .map(|resolved| resolved.value)
                .filter(|date| date != UNKNOWN)
            })
            .unwrap_or_else(|| {
                missing.push(Field::DateAdded);
                defaults.date_added.clone()
            });

        let release_year = sequences
            .release_year(index)
            .map(str::to_string)
            .unwrap_or_else(|| {
                missing.push(Field::ReleaseYear);
                defaults.release_year.clone()
            });

        let track = Track {
            name,
            album,
            date_added,
            duration,
            artists,
            release_year,
            streams: NOT_AVAILABLE.to_string(),
        };

        report_track(index, &track, missing, sink);
        track
    }

    /// Recover tracks from JSON fragments embedded in the markup.
    ///
    /// Only used when no structural rows exist. Durations, release years and
    /// dates added still come from the page-wide sequences by index.
    pub fn extract_tracks_from_json(
        &self,
        context: &ProbeContext<'_>,
        sequences: &PageSequences,
        sink: &dyn EventSink,
    ) -> Vec<Track> {
        let resolved = match first_non_empty(&EMBEDDED_TRACK_PROBES, context) {
            Ok(resolved) => resolved,
            Err(_) => {
                sink.emit(ExtractionEvent::FallbackEngaged {
                    pattern: None,
                    count: 0,
                });
                return Vec::new();
            }
        };

        sink.emit(ExtractionEvent::FallbackEngaged {
            pattern: Some(resolved.probe.to_string()),
            count: resolved.value.len(),
        });

        resolved
            .value
            .iter()
            .take(self.max_tracks)
            .enumerate()
            .map(|(index, fragment)| self.track_from_fragment(fragment, index, sequences, sink))
            .collect()
    }

    fn track_from_fragment(
        &self,
        fragment: &Match,
        index: usize,
        sequences: &PageSequences,
        sink: &dyn EventSink,
    ) -> Track {
        let defaults = Track::default();
        let mut missing = Vec::new();

        let artists: Vec<String> = fragment
            .group(2)
            .map(|raw| {
                EMBEDDED_ARTIST_NAME
                    .captures_iter(raw)
                    .filter_map(|caps| caps.get(1))
                    .map(|name| decode_json_string(name.as_str()))
                    .collect()
            })
            .unwrap_or_default();
        if artists.is_empty() {
            missing.push(Field::Artists);
        }

        let album = fragment
            .group(3)
            .map(decode_json_string)
            .unwrap_or_else(|| {
                missing.push(Field::Album);
                defaults.album.clone()
            });

        let mut from_sequence = |value: Option<&str>, field: Field, default: &str| {
            value.map(str::to_string).unwrap_or_else(|| {
                missing.push(field);
                default.to_string()
            })
        };
        let duration = from_sequence(sequences.duration(index), Field::Duration, &defaults.duration);
        let date_added =
            from_sequence(sequences.date_added(index), Field::DateAdded, &defaults.date_added);
        let release_year = from_sequence(
            sequences.release_year(index),
            Field::ReleaseYear,
            &defaults.release_year,
        );

        let track = Track {
            name: decode_json_string(&fragment.text),
            album,
            date_added,
            duration,
            artists,
            release_year,
            streams: NOT_AVAILABLE.to_string(),
        };

        report_track(index, &track, missing, sink);
        track
    }
}

impl Default for PlaylistParser {
    fn default() -> Self {
        Self::new()
    }
}

// === SHARED PARSING UTILITIES ===

/// Fold a field result into its value, reporting which way it went.
fn settle<T>(
    field: Field,
    result: Result<Resolved<T>, Miss>,
    default: T,
    sink: &dyn EventSink,
    describe: impl Fn(&T) -> String,
) -> T {
    match result {
        Ok(resolved) => {
            sink.emit(ExtractionEvent::FieldResolved {
                field,
                probe: resolved.probe.to_string(),
                value: describe(&resolved.value),
            });
            resolved.value
        }
        Err(_) => {
            sink.emit(ExtractionEvent::FieldDefaulted {
                field,
                default: describe(&default),
            });
            default
        }
    }
}

fn report_sequence(
    sequence: Sequence,
    result: Option<(&'static str, Vec<String>)>,
    sink: &dyn EventSink,
) -> Vec<String> {
    let (pattern, values) = match result {
        Some((pattern, values)) => (Some(pattern.to_string()), values),
        None => (None, Vec::new()),
    };
    sink.emit(ExtractionEvent::SequenceExtracted {
        sequence,
        pattern,
        count: values.len(),
    });
    values
}

fn report_track(index: usize, track: &Track, missing: Vec<Field>, sink: &dyn EventSink) {
    sink.emit(ExtractionEvent::TrackExtracted {
        index,
        track: track.to_string(),
        duration: track.duration.clone(),
        release_year: track.release_year.clone(),
    });
    if !missing.is_empty() {
        sink.emit(ExtractionEvent::RowIncomplete { index, missing });
    }
}

fn non_empty_text(candidate: &Match, _probe: usize) -> Option<String> {
    (!candidate.text.is_empty()).then(|| candidate.text.clone())
}

fn is_acceptable_name(name: &str) -> bool {
    let name = name.trim();
    !name.is_empty() && !NAME_DENYLIST.contains(&name)
}

/// Rules shared by header and JSON descriptions.
fn is_acceptable_json_description(description: &str, name: &str) -> bool {
    description.chars().count() > 5
        && !DESCRIPTION_DENYLIST.contains(&description)
        && description != name
        && !description.chars().all(|c| c.is_ascii_digit())
}

/// Header descriptions must also not look like the song count label.
fn is_acceptable_description(description: &str, name: &str) -> bool {
    let lower = description.to_lowercase();
    is_acceptable_json_description(description, name)
        && !lower.contains("songs")
        && !lower.contains("tracks")
}

/// Parse `1,234` or `1234`.
fn parse_grouped_number(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Decode JSON string escapes in a captured value, keeping the raw text if
/// it is not a valid JSON string body.
fn decode_json_string(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}
