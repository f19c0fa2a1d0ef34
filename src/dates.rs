//! Lenient date normalization.
//!
//! Pages expose dates in whatever shape their embedded data happens to use.
//! Nothing here validates calendars; values are trimmed to a date where that
//! is obvious and passed through otherwise.

use crate::types::UNKNOWN;

/// Year component of a release date.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::dates::get_release_year;
///
/// assert_eq!(get_release_year(Some("2021-05-10")), "2021");
/// assert_eq!(get_release_year(Some("1999")), "1999");
/// assert_eq!(get_release_year(Some("")), "Unknown");
/// assert_eq!(get_release_year(None), "Unknown");
/// ```
pub fn get_release_year(release_date: Option<&str>) -> String {
    match release_date {
        Some(date) if !date.is_empty() => date.split('-').next().unwrap_or(date).to_string(),
        _ => UNKNOWN.to_string(),
    }
}

/// Normalize the date a track was added to a playlist.
///
/// ISO timestamps are cut down to their date part; every other non-empty
/// value is returned unchanged.
///
/// # Examples
///
/// ```rust
/// use playlist_scraper::dates::parse_date_added;
///
/// assert_eq!(parse_date_added(Some("2023-12-01T00:00:00Z")), "2023-12-01");
/// assert_eq!(parse_date_added(Some("2023-12-01")), "2023-12-01");
/// assert_eq!(parse_date_added(Some("")), "Unknown");
/// ```
pub fn parse_date_added(date_string: Option<&str>) -> String {
    let date_string = match date_string {
        Some(value) if !value.is_empty() => value,
        _ => return UNKNOWN.to_string(),
    };

    if let Some((date_part, _)) = date_string.split_once('T') {
        date_part.to_string()
    } else if is_iso_date_shape(date_string) {
        date_string.to_string()
    } else {
        log::trace!("Passing through unrecognized date '{date_string}'");
        date_string.to_string()
    }
}

/// `YYYY-MM-DD` by length and separator count only.
fn is_iso_date_shape(value: &str) -> bool {
    value.len() == 10 && value.matches('-').count() == 2
}
