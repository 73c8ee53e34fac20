//! Configuration management for the playlist digest job.
//!
//! Endpoint URLs, the callback server address and a few presentation
//! settings come from environment variables, optionally loaded from a `.env`
//! file in the local data directory. Every variable has a default, so a fresh
//! installation only needs its credentials stored as properties (see
//! [`crate::management::PropertyStore`]).
//!
//! Lookup order:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults

use std::{env, path::PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SCOPE: &str = "playlist-read-private playlist-read-collaborative";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_SCHEDULE_HOUR: u32 = 9;
pub const DEFAULT_NOTIFY_HEADER: &str = "昨日見つけた東京だよ";

const APP_DIR: &str = "playlist-digest";

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is
/// not an error: all settings fall back to their defaults.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/playlist-digest/.env`
/// - macOS: `~/Library/Application Support/playlist-digest/.env`
/// - Windows: `%LOCALAPPDATA%/playlist-digest/.env`
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir)
        .await
        .map_err(|e| e.to_string())?;

    let path = dir.join(".env");
    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| e.to_string())?;
    }
    Ok(())
}

/// Root directory for properties, triggers, the run lock and the default sheet.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push(APP_DIR);
    path
}

pub fn properties_path() -> PathBuf {
    data_dir().join("properties.json")
}

pub fn trigger_path() -> PathBuf {
    data_dir().join("trigger.json")
}

pub fn lock_path() -> PathBuf {
    data_dir().join("run.lock")
}

/// Returns the CSV file that stands in for the spreadsheet.
///
/// Reads `SHEET_PATH`, defaulting to `playlist.csv` in the data directory.
pub fn sheet_path() -> PathBuf {
    env::var("SHEET_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| data_dir().join("playlist.csv"))
}

/// Returns the address the local OAuth callback server binds to.
///
/// Reads `SERVER_ADDRESS`, e.g. `127.0.0.1:8888`. Must agree with the host
/// and port of [`spotify_redirect_uri`].
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the token exchange and refresh endpoint (`SPOTIFY_API_TOKEN_URL`).
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the authorize endpoint the user is sent to (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the OAuth redirect URI (`SPOTIFY_API_REDIRECT_URI`).
///
/// The same value is sent with the authorize request and the code exchange,
/// and has to be registered in the Spotify application settings.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the requested permission scope (`SPOTIFY_API_AUTH_SCOPE`).
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Returns the local hour at which the next run is scheduled (`SCHEDULE_HOUR`).
///
/// Values that don't parse or fall outside `0..24` yield the default of 9.
pub fn schedule_hour() -> u32 {
    env::var("SCHEDULE_HOUR")
        .ok()
        .and_then(|h| h.trim().parse::<u32>().ok())
        .filter(|h| *h < 24)
        .unwrap_or(DEFAULT_SCHEDULE_HOUR)
}

/// Returns the first line of the webhook message (`NOTIFY_HEADER`).
pub fn notify_header() -> String {
    var_or("NOTIFY_HEADER", DEFAULT_NOTIFY_HEADER)
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Runtime settings handed to the job components at construction.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_url: String,
    pub token_url: String,
    pub auth_url: String,
    pub redirect_uri: String,
    pub scope: String,
    pub schedule_hour: u32,
    pub notify_header: String,
    pub sheet_path: PathBuf,
    pub trigger_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            api_url: spotify_apiurl(),
            token_url: spotify_apitoken_url(),
            auth_url: spotify_apiauth_url(),
            redirect_uri: spotify_redirect_uri(),
            scope: spotify_scope(),
            schedule_hour: schedule_hour(),
            notify_header: notify_header(),
            sheet_path: sheet_path(),
            trigger_path: trigger_path(),
        }
    }
}
