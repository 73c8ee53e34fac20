//! # API Module
//!
//! HTTP endpoints served by the local callback server during
//! `playlist-digest auth`.
//!
//! - [`callback`] - Accepts the redirect from Spotify's authorize page,
//!   checks the `state` parameter and hands the authorization code to the
//!   waiting command through shared state.
//!
//! The exchange of the code for tokens happens in [`crate::cli`], where the
//! property store is loaded, so the handler only records the code.

mod callback;

pub use callback::callback;
