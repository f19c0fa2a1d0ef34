pub mod analyze;

use clap::Subcommand;
use playlist_scraper::{extract_playlist_id, ScraperConfig};
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a playlist page and save the result
    ///
    /// Fetches the page over HTTP, extracts playlist metadata and up to 20
    /// tracks, prints a summary and writes the record as JSON into the
    /// results directory.
    ///
    /// Usage examples:
    /// # Analyze a live playlist
    /// playlist-scraper analyze https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd
    ///
    /// # Re-run extraction against a page saved earlier
    /// playlist-scraper analyze https://open.spotify.com/playlist/37i9dQZF1DX0XUsuxWHRQd --html SpotifyData/debug_page_1700000000.html
    ///
    /// # Print the JSON record without writing it
    /// playlist-scraper analyze <URL> --json --no-save
    Analyze {
        /// Playlist URL
        url: String,

        /// Read the page from a saved HTML file instead of fetching it
        #[arg(long, value_name = "FILE")]
        html: Option<PathBuf>,

        /// File name for the saved record (defaults to the playlist name)
        #[arg(long, value_name = "NAME")]
        output: Option<String>,

        /// Directory records are written to
        #[arg(long, value_name = "DIR")]
        results_dir: Option<PathBuf>,

        /// Do not write the record to disk
        #[arg(long)]
        no_save: bool,

        /// Print the JSON record instead of the summary
        #[arg(long)]
        json: bool,

        /// Keep a copy of the fetched page in the results directory
        #[arg(long)]
        save_html: bool,

        /// Number of tracks to keep (at most 20)
        #[arg(long)]
        max_tracks: Option<usize>,
    },

    /// Print the playlist identifier contained in a URL
    Id {
        /// Playlist URL
        url: String,
    },
}

pub async fn execute_command(
    command: Commands,
    mut config: ScraperConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Analyze {
            url,
            html,
            output,
            results_dir,
            no_save,
            json,
            save_html,
            max_tracks,
        } => {
            if let Some(results_dir) = results_dir {
                config.results_dir = results_dir;
            }
            if let Some(max_tracks) = max_tracks {
                config.max_tracks = max_tracks;
            }
            config.save_debug_html |= save_html;

            let options = analyze::AnalyzeOptions {
                html,
                output,
                save: !no_save,
                json,
            };
            analyze::handle_analyze_command(&url, config, &options).await
        }

        Commands::Id { url } => match extract_playlist_id(&url) {
            Some(id) => {
                println!("{id}");
                Ok(())
            }
            None => Err(format!("No playlist id found in {url}").into()),
        },
    }
}
