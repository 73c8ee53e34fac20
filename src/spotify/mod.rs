//! # Spotify Integration Module
//!
//! Thin client for the two Spotify services the job talks to:
//!
//! ```text
//! Job (schedule, fetch, sheet, notify)
//!          ↓
//! Spotify Integration Layer
//!     ├── Authentication (authorization code + refresh)
//!     └── Playlist listing (paginated)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//! ```
//!
//! ## Modules
//!
//! [`auth`] - Token lifecycle against the accounts service:
//! - **Code Exchange**: spends the one-time authorization code, at most once
//! - **Refresh**: renews the access token, keeping the refresh token unless a
//!   new one is issued
//! - **Authorize URL**: builds the consent URL for the `auth` command
//!
//! [`playlist`] - Reads every entry of a playlist:
//! - **Pagination**: 100 entries per page, following `next` until it is null
//! - **Re-authentication**: one refresh on 401, then the listing restarts
//! - **Explicit outcome**: non-200 answers become
//!   [`playlist::PlaylistFetch::Unavailable`] instead of an error
//!
//! ## Endpoints
//!
//! - `GET /playlists/{id}/tracks?limit=100&offset={n}`
//! - `POST /api/token` (`authorization_code` and `refresh_token` grants)
//!
//! ## Error Types
//!
//! - [`auth::AuthError`] - token requests and missing credentials
//! - [`playlist::FetchError`] - transport failures and failed refreshes

pub mod auth;
pub mod playlist;
