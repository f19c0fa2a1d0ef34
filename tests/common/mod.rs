#![allow(dead_code)]
use async_trait::async_trait;
use playlist_scraper::events::RecordingSink;
use playlist_scraper::{DocumentSource, Html, PlaylistParser, RawPage, Result, ScrapedPlaylist};

/// One structural track row for a fixture page.
pub struct RowFixture<'a> {
    pub name: &'a str,
    pub artists: &'a [&'a str],
    pub album: Option<&'a str>,
    pub duration: Option<&'a str>,
    pub added: Option<&'a str>,
}

impl<'a> RowFixture<'a> {
    pub fn new(name: &'a str, artists: &'a [&'a str]) -> Self {
        Self {
            name,
            artists,
            album: None,
            duration: None,
            added: None,
        }
    }

    pub fn album(mut self, album: &'a str) -> Self {
        self.album = Some(album);
        self
    }

    pub fn duration(mut self, duration: &'a str) -> Self {
        self.duration = Some(duration);
        self
    }

    pub fn added(mut self, added: &'a str) -> Self {
        self.added = Some(added);
        self
    }

    pub fn render(&self, position: usize) -> String {
        let artists = self
            .artists
            .iter()
            .enumerate()
            .map(|(i, artist)| format!(r#"<a href="/artist/{position}-{i}">{artist}</a>"#))
            .collect::<Vec<_>>()
            .join(", ");
        let album = self
            .album
            .map(|album| format!(r#"<div><a href="/album/{position}">{album}</a></div>"#))
            .unwrap_or_default();
        let added = self
            .added
            .map(|added| format!(r#"<div><time datetime="{added}">{added}</time></div>"#))
            .unwrap_or_default();
        let duration = self
            .duration
            .map(|duration| format!(r#"<div class="duration">{duration}</div>"#))
            .unwrap_or_default();

        format!(
            r#"<div data-testid="tracklist-row" aria-rowindex="{row}">
                <div>{position}</div>
                <div>
                    <a data-testid="internal-track-link" href="/track/{position}"><div>{name}</div></a>
                    <span>{artists}</span>
                </div>
                {album}
                {added}
                {duration}
            </div>"#,
            row = position + 1,
            name = self.name,
        )
    }
}

/// Wrap header and body fragments in a playlist page skeleton.
pub fn playlist_page(header: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><title>Playlist</title></head>
<body>
<main>
<section data-testid="playlist-page">
    <div class="header">{header}</div>
    <div data-testid="playlist-tracklist">{body}</div>
</section>
</main>
</body>
</html>"#
    )
}

pub fn rows_page(header: &str, rows: &[RowFixture<'_>]) -> String {
    let body = rows
        .iter()
        .enumerate()
        .map(|(i, row)| row.render(i + 1))
        .collect::<Vec<_>>()
        .join("\n");
    playlist_page(header, &body)
}

pub fn parse(markup: &str) -> (ScrapedPlaylist, RecordingSink) {
    let document = Html::parse_document(markup);
    let sink = RecordingSink::new();
    let playlist = PlaylistParser::new().parse_playlist(&document, markup, &sink);
    (playlist, sink)
}

/// Document source serving fixed markup for every URL.
pub struct StaticSource {
    pub status: u16,
    pub markup: String,
}

impl StaticSource {
    pub fn ok(markup: impl Into<String>) -> Self {
        Self {
            status: 200,
            markup: markup.into(),
        }
    }
}

#[async_trait(?Send)]
impl DocumentSource for StaticSource {
    async fn fetch(&self, url: &str) -> Result<RawPage> {
        Ok(RawPage {
            url: url.to_string(),
            status: self.status,
            markup: self.markup.clone(),
        })
    }
}
