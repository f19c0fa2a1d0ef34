//! # Extraction Events
//!
//! The extraction pipeline reports what it found, what it skipped and which
//! fallbacks it used through an [`EventSink`] handed in by the caller. The
//! default [`LogSink`] forwards everything to the `log` facade; tests use
//! [`RecordingSink`] to assert on the events themselves.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Mutex;

/// A field the pipeline tries to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Description,
    TotalSaves,
    NumberOfSongs,
    TotalDuration,
    TrackName,
    Artists,
    Album,
    Duration,
    DateAdded,
    ReleaseYear,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Name => "name",
            Field::Description => "description",
            Field::TotalSaves => "total saves",
            Field::NumberOfSongs => "number of songs",
            Field::TotalDuration => "total duration",
            Field::TrackName => "track name",
            Field::Artists => "artists",
            Field::Album => "album",
            Field::Duration => "duration",
            Field::DateAdded => "date added",
            Field::ReleaseYear => "release year",
        };
        f.write_str(name)
    }
}

/// A page-wide sequence that is zipped onto track rows by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sequence {
    Durations,
    ReleaseYears,
    DatesAdded,
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Sequence::Durations => "durations",
            Sequence::ReleaseYears => "release years",
            Sequence::DatesAdded => "dates added",
        };
        f.write_str(name)
    }
}

/// Structured diagnostics emitted while a page is processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ExtractionEvent {
    /// The page could not be fetched completely or lacks the expected structure
    AcquisitionProblem {
        /// The URL being processed
        url: String,
        /// What went wrong
        message: String,
    },
    /// A playlist-level field was resolved by one of its probes
    FieldResolved {
        field: Field,
        /// The selector or pattern that produced the value
        probe: String,
        value: String,
    },
    /// No probe produced an acceptable value; the default was kept
    FieldDefaulted {
        field: Field,
        default: String,
    },
    /// A page-wide sequence was collected
    SequenceExtracted {
        sequence: Sequence,
        /// The pattern that produced the matches, absent when nothing matched
        pattern: Option<String>,
        count: usize,
    },
    /// Structural track rows were found
    RowsLocated {
        selector: String,
        count: usize,
    },
    /// Structural rows were missing and embedded data was scanned instead
    FallbackEngaged {
        /// The pattern that produced the tracks, absent when nothing matched
        pattern: Option<String>,
        count: usize,
    },
    /// A track record was produced
    TrackExtracted {
        /// Zero-based position in the playlist
        index: usize,
        track: String,
        duration: String,
        release_year: String,
    },
    /// Some sub-fields of a track fell back to their defaults
    RowIncomplete {
        index: usize,
        missing: Vec<Field>,
    },
}

/// Receiver for [`ExtractionEvent`]s.
///
/// Sinks are passed into the pipeline as a capability, so a run decides for
/// itself where its diagnostics go.
pub trait EventSink {
    fn emit(&self, event: ExtractionEvent);
}

/// Sink that writes every event to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: ExtractionEvent) {
        match event {
            ExtractionEvent::AcquisitionProblem { url, message } => {
                log::warn!("{url}: {message}, continuing anyway");
            }
            ExtractionEvent::FieldResolved {
                field,
                probe,
                value,
            } => {
                let preview: String = value.chars().take(50).collect();
                log::info!("Found {field}: {preview}");
                log::debug!("{field} resolved by probe {probe}");
            }
            ExtractionEvent::FieldDefaulted { field, default } => {
                log::debug!("No {field} found, using default '{default}'");
            }
            ExtractionEvent::SequenceExtracted {
                sequence,
                pattern,
                count,
            } => match pattern {
                Some(pattern) => log::info!("Found {count} {sequence} using pattern {pattern}"),
                None => log::debug!("No {sequence} found in page markup"),
            },
            ExtractionEvent::RowsLocated { selector, count } => {
                log::info!("Found {count} track rows using selector: {selector}");
            }
            ExtractionEvent::FallbackEngaged { pattern, count } => match pattern {
                Some(pattern) => {
                    log::info!("Found {count} tracks in embedded data using pattern {pattern}")
                }
                None => log::warn!("No track rows and no embedded track data found"),
            },
            ExtractionEvent::TrackExtracted {
                index,
                track,
                duration,
                release_year,
            } => {
                log::debug!(
                    "Extracted track {}: {track} ({duration}) - {release_year}",
                    index + 1
                );
            }
            ExtractionEvent::RowIncomplete { index, missing } => {
                let missing = missing
                    .iter()
                    .map(|field| field.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                log::debug!("Track {} is missing: {missing}", index + 1);
            }
        }
    }
}

/// Sink that keeps every event in memory.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::events::{EventSink, ExtractionEvent, Field, RecordingSink};
///
/// let sink = RecordingSink::new();
/// sink.emit(ExtractionEvent::FieldDefaulted {
///     field: Field::Description,
///     default: String::new(),
/// });
///
/// assert_eq!(sink.events().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events recorded so far, oldest first.
    pub fn events(&self) -> Vec<ExtractionEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Fields that ended up with their default value.
    pub fn defaulted_fields(&self) -> Vec<Field> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ExtractionEvent::FieldDefaulted { field, .. } => Some(field),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: ExtractionEvent) {
        match self.events.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
