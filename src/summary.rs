//! Human-readable summary of an analysis.

use crate::types::{AnalysisOutcome, PlaylistAnalysis, UNKNOWN};
use std::fmt;

const RULE_WIDTH: usize = 70;

/// Render an outcome as the block of text printed at the end of a run.
///
/// A failed outcome renders as a single `Error: <message>` line.
pub fn render_summary(outcome: &AnalysisOutcome) -> String {
    Summary(outcome).to_string()
}

/// Display adapter for the end-of-run summary.
pub struct Summary<'a>(pub &'a AnalysisOutcome);

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            AnalysisOutcome::Completed(analysis) => write_analysis(f, analysis),
            AnalysisOutcome::Failed { error } => writeln!(f, "Error: {error}"),
        }
    }
}

fn write_analysis(f: &mut fmt::Formatter<'_>, analysis: &PlaylistAnalysis) -> fmt::Result {
    let metadata = &analysis.playlist_metadata;
    let tracks = &analysis.tracks;
    let heavy_rule = "=".repeat(RULE_WIDTH);

    writeln!(f, "\n{heavy_rule}")?;
    writeln!(f, "PLAYLIST ANALYSIS SUMMARY")?;
    writeln!(f, "{heavy_rule}")?;

    writeln!(f, "Playlist Name: {}", metadata.name)?;
    writeln!(f, "Description: {}", metadata.description)?;
    writeln!(f, "Total Songs: {}", metadata.number_of_songs)?;
    writeln!(f, "Total Duration: {}", metadata.total_duration)?;
    if let Some(calculated) = &metadata.calculated_duration {
        writeln!(f, "Calculated Duration: {calculated}")?;
    }
    writeln!(f, "Total Saves: {}", metadata.total_saves)?;
    writeln!(f, "Tracks Analyzed: {}", tracks.len())?;

    if tracks.is_empty() {
        return writeln!(f, "\nNo tracks found");
    }

    writeln!(f, "\nTOP {} TRACKS:", tracks.len())?;
    writeln!(f, "{}", "-".repeat(RULE_WIDTH))?;

    for (i, track) in tracks.iter().enumerate() {
        writeln!(f, "{:2}. {}", i + 1, track.name)?;
        writeln!(f, "    Artist(s): {}", track.artist_list())?;
        writeln!(f, "    Album: {}", track.album)?;
        writeln!(f, "    Duration: {}", track.duration)?;
        writeln!(f, "    Release Year: {}", track.release_year)?;
        if track.date_added != UNKNOWN {
            writeln!(f, "    Date Added: {}", track.date_added)?;
        }
        writeln!(f)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaylistMetadata, Track};

    #[test]
    fn failed_outcome_renders_error_line() {
        let outcome = AnalysisOutcome::Failed {
            error: "Invalid URL: nope".to_string(),
        };
        assert_eq!(render_summary(&outcome), "Error: Invalid URL: nope\n");
    }

    #[test]
    fn lists_tracks_with_optional_date() {
        let metadata = PlaylistMetadata {
            name: "Focus".to_string(),
            number_of_songs: 2,
            calculated_duration: Some("7:15".to_string()),
            ..PlaylistMetadata::default()
        };
        let tracks = vec![
            Track {
                name: "One".to_string(),
                artists: vec!["A".to_string(), "B".to_string()],
                date_added: "2024-01-02".to_string(),
                ..Track::default()
            },
            Track {
                name: "Two".to_string(),
                ..Track::default()
            },
        ];
        let analysis = PlaylistAnalysis::new("u", None, metadata, tracks);
        let text = render_summary(&AnalysisOutcome::Completed(analysis));

        assert!(text.contains("Playlist Name: Focus"));
        assert!(text.contains("Calculated Duration: 7:15"));
        assert!(text.contains(" 1. One\n    Artist(s): A, B"));
        assert!(text.contains(" 2. Two\n    Artist(s): Unknown"));
        assert_eq!(text.matches("Date Added:").count(), 1);
    }

    #[test]
    fn empty_track_list_is_called_out() {
        let analysis = PlaylistAnalysis::new("u", None, PlaylistMetadata::default(), Vec::new());
        let text = render_summary(&AnalysisOutcome::Completed(analysis));
        assert!(text.contains("No tracks found"));
        assert!(!text.contains("Calculated Duration"));
    }

    #[test]
    fn summary_displays_inline() {
        let analysis = PlaylistAnalysis::new("u", None, PlaylistMetadata::default(), Vec::new());
        let outcome = AnalysisOutcome::Completed(analysis);

        let text = format!("{}", Summary(&outcome));

        assert_eq!(text, render_summary(&outcome));
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("=".repeat(RULE_WIDTH).as_str()));
        assert_eq!(lines.next(), Some("PLAYLIST ANALYSIS SUMMARY"));
        assert!(text.ends_with("\nNo tracks found\n"));
    }
}
