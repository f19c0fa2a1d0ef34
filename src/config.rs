//! Layered scraper configuration.
//!
//! Values come from built-in defaults, then an optional
//! `playlist-scraper/config.toml` in the user's config directory, then
//! `PLAYLIST_SCRAPER_*` environment variables. Command-line flags are applied
//! on top by the binary.

use crate::types::MAX_TRACKS;
use crate::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Prefix for environment overrides, e.g. `PLAYLIST_SCRAPER_RESULTS_DIR`.
pub const ENV_PREFIX: &str = "PLAYLIST_SCRAPER";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";

/// Settings for one scraper run.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::ScraperConfig;
///
/// let config = ScraperConfig::default();
/// assert_eq!(config.results_dir.to_str(), Some("SpotifyData"));
/// assert_eq!(config.fetch_timeout().as_secs(), 30);
/// assert_eq!(config.max_tracks, 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Directory analysis records and debug pages are written to
    pub results_dir: PathBuf,
    /// Upper bound on a single page fetch, redirects included
    pub fetch_timeout_secs: u64,
    /// Pause between acquiring a page and extracting from it
    pub settle_delay_ms: u64,
    /// Number of tracks to keep, clamped to 20
    pub max_tracks: usize,
    pub user_agent: String,
    /// Keep a copy of every fetched page as `debug_page_<unix>.html`
    pub save_debug_html: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from("SpotifyData"),
            fetch_timeout_secs: 30,
            settle_delay_ms: 0,
            max_tracks: MAX_TRACKS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            save_debug_html: false,
        }
    }
}

impl ScraperConfig {
    /// Load configuration from the default config file location and the
    /// environment.
    pub fn load() -> Result<Self> {
        let path = Self::default_config_path();
        Self::load_from(path.as_deref())
    }

    /// Load configuration from an explicit file (if any) and the environment.
    ///
    /// A missing file is not an error; a malformed one is.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            log::debug!("Reading configuration from {}", path.display());
            builder = builder.add_source(File::from(path).required(false));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: ScraperConfig = settings.try_deserialize()?;
        log::debug!("Loaded configuration: {config:?}");
        Ok(config)
    }

    /// `<config dir>/playlist-scraper/config.toml`, when the platform has a
    /// config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("playlist-scraper").join("config.toml"))
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}
