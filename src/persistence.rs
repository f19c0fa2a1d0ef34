use crate::types::PlaylistAnalysis;
use crate::Result;
use regex::Regex;
use std::fs;
use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::{SystemTime, UNIX_EPOCH};

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\-]").unwrap());

/// Writes analysis records and debug copies of fetched pages.
///
/// Everything lands in a single results directory, created on first write:
/// `<results_dir>/<Playlist_Name>.json` for analyses and
/// `<results_dir>/debug_page_<unix-seconds>.html` for raw markup.
#[derive(Debug, Clone)]
pub struct AnalysisStore {
    results_dir: PathBuf,
}

impl AnalysisStore {
    pub fn new(results_dir: impl Into<PathBuf>) -> Self {
        Self {
            results_dir: results_dir.into(),
        }
    }

    /// Save an analysis as pretty-printed JSON.
    ///
    /// The file is named after the playlist unless `filename` is given.
    /// Returns the path that was written.
    pub fn save_analysis(
        &self,
        analysis: &PlaylistAnalysis,
        filename: Option<&str>,
    ) -> Result<PathBuf> {
        let filename = match filename {
            Some(name) => name.to_string(),
            None => playlist_filename(&analysis.playlist_metadata.name),
        };

        fs::create_dir_all(&self.results_dir)?;
        let path = self.results_dir.join(filename);

        let json = serde_json::to_string_pretty(analysis)?;
        fs::write(&path, json)?;

        log::info!("Analysis saved to: {}", path.display());
        Ok(path)
    }

    /// Save raw page markup for later inspection.
    pub fn save_debug_html(&self, markup: &str) -> Result<PathBuf> {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs())
            .unwrap_or(0);

        fs::create_dir_all(&self.results_dir)?;
        let path = self.results_dir.join(format!("debug_page_{timestamp}.html"));
        fs::write(&path, markup)?;

        log::info!("Debug HTML saved to: {}", path.display());
        Ok(path)
    }
}

/// File name for a playlist's analysis record.
///
/// Spaces become underscores and every other non-word character except `-`
/// is dropped.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::persistence::playlist_filename;
///
/// assert_eq!(playlist_filename("Today's Top Hits"), "Todays_Top_Hits.json");
/// assert_eq!(playlist_filename("lo-fi beats"), "lo-fi_beats.json");
/// assert_eq!(playlist_filename("!!!"), "playlist.json");
/// ```
pub fn playlist_filename(name: &str) -> String {
    let underscored = name.replace(' ', "_");
    let stem = NON_WORD.replace_all(&underscored, "");
    if stem.is_empty() {
        "playlist.json".to_string()
    } else {
        format!("{stem}.json")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PlaylistMetadata, Track};

    fn scratch_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "playlist-scraper-{name}-{}",
            std::process::id()
        ))
    }

    #[test]
    fn keeps_unicode_word_characters() {
        assert_eq!(playlist_filename("Café del Mar"), "Café_del_Mar.json");
    }

    #[test]
    fn saves_pretty_json_named_after_playlist() {
        let dir = scratch_dir("save");
        let store = AnalysisStore::new(&dir);
        let metadata = PlaylistMetadata {
            name: "Chill Vibes".to_string(),
            ..PlaylistMetadata::default()
        };
        let analysis = PlaylistAnalysis::new(
            "https://open.spotify.com/playlist/abc",
            Some("abc".to_string()),
            metadata,
            vec![Track::default()],
        );

        let path = store.save_analysis(&analysis, None).unwrap();
        assert_eq!(path, dir.join("Chill_Vibes.json"));

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("\n  \"type\": \"playlist\""));
        let parsed: PlaylistAnalysis = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed.tracks_analyzed, 1);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn explicit_filename_wins() {
        let dir = scratch_dir("override");
        let store = AnalysisStore::new(&dir);
        let analysis = PlaylistAnalysis::new("u", None, PlaylistMetadata::default(), Vec::new());

        let path = store.save_analysis(&analysis, Some("custom.json")).unwrap();
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some("custom.json"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn debug_html_is_timestamped() {
        let dir = scratch_dir("debug");
        let store = AnalysisStore::new(&dir);
        let path = store.save_debug_html("<html></html>").unwrap();
        let name = path.file_name().and_then(|n| n.to_str()).unwrap().to_string();
        assert!(name.starts_with("debug_page_") && name.ends_with(".html"));
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        let _ = fs::remove_dir_all(&dir);
    }
}
