use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::{DateTime, NaiveDate, TimeZone};
use rand::{Rng, distr::Alphanumeric};

use crate::types::{PlaylistEntry, TrackArtist};

/// Random value for the `state` parameter of the authorize request.
pub fn generate_state() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Encodes `client_id:client_secret` for an HTTP Basic authorization header.
pub fn basic_credentials(client_id: &str, client_secret: &str) -> String {
    STANDARD.encode(format!("{}:{}", client_id, client_secret))
}

pub fn join_artist_names(artists: &[TrackArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Calendar date of an `added_at` timestamp as seen in `tz`.
///
/// Returns `None` when the timestamp is not valid RFC 3339, so such entries
/// never compare equal to any day.
pub fn added_on<Tz: TimeZone>(added_at: &str, tz: &Tz) -> Option<NaiveDate> {
    DateTime::parse_from_rfc3339(added_at)
        .ok()
        .map(|dt| dt.with_timezone(tz).date_naive())
}

pub fn entry_name(entry: &PlaylistEntry) -> String {
    entry
        .track
        .as_ref()
        .map(|t| t.name.clone())
        .unwrap_or_default()
}

pub fn entry_artists(entry: &PlaylistEntry) -> String {
    entry
        .track
        .as_ref()
        .map(|t| join_artist_names(&t.artists))
        .unwrap_or_default()
}

pub fn entry_url(entry: &PlaylistEntry) -> Option<String> {
    entry
        .track
        .as_ref()
        .and_then(|t| t.external_urls.spotify.clone())
}

pub fn entry_release_date(entry: &PlaylistEntry) -> String {
    entry
        .track
        .as_ref()
        .and_then(|t| t.album.release_date.clone())
        .unwrap_or_default()
}

/// Hides all but the last four characters of a secret for display.
pub fn mask_secret(value: &str) -> String {
    let count = value.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }

    let tail: String = value.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
