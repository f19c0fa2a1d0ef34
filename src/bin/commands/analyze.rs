use playlist_scraper::{
    render_summary, AnalysisOutcome, AnalysisStore, DocumentSource, FileDocumentSource,
    HttpDocumentSource, LogSink, PlaylistAnalyzer, ScraperConfig,
};
use std::path::PathBuf;

pub struct AnalyzeOptions {
    pub html: Option<PathBuf>,
    pub output: Option<String>,
    pub save: bool,
    pub json: bool,
}

/// Analyze one playlist, print the result and optionally persist it.
pub async fn handle_analyze_command(
    url: &str,
    config: ScraperConfig,
    options: &AnalyzeOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source: Box<dyn DocumentSource> = match &options.html {
        Some(path) => {
            println!("📁 Using saved page {}", path.display());
            Box::new(FileDocumentSource::new(path))
        }
        None => {
            let http_client = http_client::native::NativeClient::new();
            Box::new(HttpDocumentSource::new(Box::new(http_client), &config))
        }
    };

    let store = AnalysisStore::new(&config.results_dir);
    let analyzer = PlaylistAnalyzer::new(source, config);

    println!("🔍 Analyzing playlist: {url}");
    let outcome = analyzer.analyze_playlist(url, &LogSink).await;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", render_summary(&outcome));
    }

    let analysis = match &outcome {
        AnalysisOutcome::Completed(analysis) => analysis,
        AnalysisOutcome::Failed { error } => return Err(error.clone().into()),
    };

    if options.save {
        let path = store.save_analysis(analysis, options.output.as_deref())?;
        println!("💾 Analysis saved to: {}", path.display());
    }

    println!("✅ Analysis completed successfully!");
    Ok(())
}
