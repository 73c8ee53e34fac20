use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub track: Option<Track>,
    /// Missing for entries added before Spotify started recording it.
    #[serde(default)]
    pub added_at: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<TrackArtist>,
    #[serde(default)]
    pub external_urls: ExternalUrls,
    #[serde(default)]
    pub album: TrackAlbum,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackArtist {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackAlbum {
    pub release_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistTracksPage {
    pub items: Vec<PlaylistEntry>,
    pub next: Option<String>,
}

/// Body of the accounts service token endpoint. Both fields are optional:
/// a refresh grant may omit `refresh_token`, and error bodies omit both.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub text: String,
    pub mrkdwn: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub handler: String,
    pub at: DateTime<FixedOffset>,
    pub created_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone)]
pub struct AuthorizationState {
    pub expected_state: String,
    pub code: Option<String>,
}

#[derive(Debug, Clone, Tabled)]
pub struct NewTrackRow {
    pub added_at: String,
    pub artists: String,
    pub name: String,
}

#[derive(Tabled)]
pub struct PropertyRow {
    pub key: String,
    pub value: String,
}
