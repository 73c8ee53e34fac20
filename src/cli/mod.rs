//! # CLI Module
//!
//! User-facing commands of `playlist-digest`. Each command loads what it
//! needs (settings, properties, the pending trigger), calls into the library
//! layers and reports through the crate's output macros.
//!
//! ## Commands
//!
//! - [`run`] - The daily job: schedule the next run, fetch the playlist,
//!   rewrite the sheet and announce yesterday's additions
//! - [`watch`] - Long-running loop that fires pending one-shot triggers
//! - [`auth`] - Obtains an authorization code through the local callback
//!   server and exchanges it for tokens
//! - [`set_property`], [`unset_property`], [`list_properties`] - Manage the
//!   stored credentials and targets
//!
//! ## Layering
//!
//! ```text
//! CLI Layer (commands, output)
//!     ↓
//! Job / Management Layer (orchestration, properties, triggers, lock)
//!     ↓
//! Spotify, Sheet and Webhook clients
//! ```
//!
//! `run` and `watch` share [`run::run_once`], which holds the run lock and
//! returns errors instead of exiting so the watcher can keep going.
//!
//! ## Usage Patterns
//!
//! ```bash
//! playlist-digest props set clientID <id>
//! playlist-digest props set clientSecret <secret>
//! playlist-digest props set playlistID <playlist>
//! playlist-digest props set incomingWebhook <url>
//! playlist-digest auth        # one-time authorization
//! playlist-digest             # run now and schedule tomorrow 09:00
//! playlist-digest watch       # keep firing the daily trigger
//! ```

mod auth;
mod props;
pub mod run;
mod watch;

pub use auth::auth;
pub use props::list_properties;
pub use props::set_property;
pub use props::unset_property;
pub use run::run;
pub use watch::watch;
