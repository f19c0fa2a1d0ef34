mod commands;

use clap::Parser;
use commands::{execute_command, Commands};
use playlist_scraper::ScraperConfig;
use std::path::PathBuf;

/// Playlist page scraper
#[derive(Parser)]
#[command(
    name = "playlist-scraper",
    about = "Extract playlist metadata and track listings from playlist pages",
    long_about = None
)]
struct Cli {
    /// Show detailed debug information
    #[arg(long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to <config dir>/playlist-scraper/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let config_path = args.config.or_else(ScraperConfig::default_config_path);
    let config = match ScraperConfig::load_from(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = execute_command(args.command, config).await {
        eprintln!("❌ Command failed: {e}");
        std::process::exit(1);
    }

    Ok(())
}
