mod common;

use common::{parse, playlist_page};
use playlist_scraper::events::{ExtractionEvent, Field};
use playlist_scraper::PlaylistMetadata;

#[test_log::test]
fn test_full_header_is_extracted() {
    let header = r#"
        <span>Public Playlist</span>
        <h1 data-testid="entityTitle" data-encore-id="type">Today's Top Hits</h1>
        <div data-testid="description">The hottest 50. Cover: Sabrina Carpenter</div>
        <div><span>Spotify</span> • <span>34,567,890 saves</span> • <span>50 songs, about 2 hr 45 min</span></div>
    "#;
    let markup = playlist_page(header, "");

    let (playlist, sink) = parse(&markup);
    let metadata = &playlist.metadata;

    assert_eq!(metadata.name, "Today's Top Hits");
    assert_eq!(
        metadata.description,
        "The hottest 50. Cover: Sabrina Carpenter"
    );
    assert_eq!(metadata.total_saves, "34,567,890");
    assert_eq!(metadata.number_of_songs, 50);
    assert_eq!(metadata.total_duration, "2:45:00");
    assert_eq!(metadata.calculated_duration, None);

    assert!(sink.defaulted_fields().is_empty());
    assert!(sink.events().iter().any(|event| matches!(
        event,
        ExtractionEvent::FieldResolved { field: Field::Name, probe, .. }
            if probe == r#"h1[data-testid="entityTitle"]"#
    )));
}

#[test]
fn test_numeric_description_stays_empty() {
    let header = r#"<h1>Numbers Only</h1><div data-testid="description">12345</div>"#;
    let markup = playlist_page(header, "");

    let (playlist, sink) = parse(&markup);

    assert_eq!(playlist.metadata.description, "");
    assert!(sink.defaulted_fields().contains(&Field::Description));
}

#[test]
fn test_description_never_equals_name() {
    let header = r#"<h1>Late Night Jazz</h1>
        <div data-testid="description">Late Night Jazz</div>
        <p data-encore-id="text">Smooth sounds for after dark</p>"#;
    let markup = playlist_page(header, "");

    let (playlist, _) = parse(&markup);

    assert_eq!(playlist.metadata.name, "Late Night Jazz");
    assert_eq!(playlist.metadata.description, "Smooth sounds for after dark");
}

#[test]
fn test_likes_count_as_saves() {
    let header = r#"<h1>Liked</h1><span>812 likes</span>"#;
    let markup = playlist_page(header, "");

    let (playlist, _) = parse(&markup);

    assert_eq!(playlist.metadata.total_saves, "812");
}

#[test]
fn test_minutes_and_seconds_duration() {
    let header = r#"<h1>Short Set</h1><span>9 songs, 38 min 12 sec</span>"#;
    let markup = playlist_page(header, "");

    let (playlist, _) = parse(&markup);

    assert_eq!(playlist.metadata.number_of_songs, 9);
    assert_eq!(playlist.metadata.total_duration, "38:12");
}

#[test]
fn test_empty_page_keeps_every_default() {
    let (playlist, sink) = parse("");

    assert_eq!(playlist.metadata, PlaylistMetadata::default());
    let defaulted = sink.defaulted_fields();
    for field in [
        Field::Name,
        Field::Description,
        Field::TotalSaves,
        Field::NumberOfSongs,
        Field::TotalDuration,
    ] {
        assert!(defaulted.contains(&field), "{field} should be defaulted");
    }
}
