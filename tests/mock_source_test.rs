#[cfg(feature = "mock")]
mod mock_tests {
    use mockall::predicate::*;
    use playlist_scraper::events::{ExtractionEvent, RecordingSink};
    use playlist_scraper::{
        MockDocumentSource, PlaylistAnalyzer, PlaylistMetadata, RawPage, ScrapeError,
        ScraperConfig,
    };

    const URL: &str = "https://open.spotify.com/playlist/mocked";

    #[tokio::test]
    async fn test_mock_source_is_called_once_with_url() {
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .with(eq(URL))
            .times(1)
            .returning(|url| {
                Ok(RawPage {
                    url: url.to_string(),
                    status: 200,
                    markup: r#"<main><h1>Mocked Mix</h1><span>12 songs</span></main>"#
                        .to_string(),
                })
            });

        let analyzer = PlaylistAnalyzer::new(Box::new(source), ScraperConfig::default());
        let outcome = analyzer.analyze_playlist(URL, &RecordingSink::new()).await;

        let analysis = outcome.analysis().expect("mocked page should analyze");
        assert_eq!(analysis.playlist_metadata.name, "Mocked Mix");
        assert_eq!(analysis.playlist_metadata.number_of_songs, 12);
        assert_eq!(analysis.playlist_id.as_deref(), Some("mocked"));
    }

    #[tokio::test]
    async fn test_mock_timeout_is_not_fatal() {
        let mut source = MockDocumentSource::new();
        source.expect_fetch().times(1).returning(|url| {
            Err(ScrapeError::Timeout {
                url: url.to_string(),
                seconds: 30,
            })
        });

        let analyzer = PlaylistAnalyzer::new(Box::new(source), ScraperConfig::default());
        let sink = RecordingSink::new();
        let outcome = analyzer.analyze_playlist(URL, &sink).await;

        assert!(!outcome.is_error());
        let analysis = outcome.analysis().expect("timeout should still yield a record");
        assert_eq!(analysis.playlist_metadata, PlaylistMetadata::default());
        assert!(analysis.tracks.is_empty());

        let timed_out = sink.events().into_iter().any(|event| {
            matches!(
                event,
                ExtractionEvent::AcquisitionProblem { url, message }
                    if url == URL && message.contains("30 seconds")
            )
        });
        assert!(timed_out, "timeout should be reported as an acquisition problem");
    }
}
