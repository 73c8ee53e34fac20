//! Playlist Digest Library
//!
//! This library implements a daily job that mirrors a Spotify playlist into a
//! sheet and posts the tracks added on the previous day to an incoming
//! webhook. It also manages the OAuth token lifecycle needed to read the
//! playlist.
//!
//! # Modules
//!
//! - `api` - HTTP endpoints of the local authorization callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration from environment variables and `.env`
//! - `job` - The daily run tying the components together
//! - `management` - Persistent properties, triggers and the run lock
//! - `notify` - Selection and announcement of yesterday's additions
//! - `schedule` - One-shot trigger computation and registration
//! - `server` - Local HTTP server for the OAuth callback
//! - `sheet` - Spreadsheet abstraction and CSV-backed sheet
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use playlist_digest::{cli, config};
//!
//! #[tokio::main]
//! async fn main() {
//!     config::load_env().await.ok();
//!     cli::run().await;
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod job;
pub mod management;
pub mod notify;
pub mod schedule;
pub mod server;
pub mod sheet;
pub mod spotify;
pub mod types;
pub mod utils;

/// Result alias used at the command layer, where errors of every module
/// meet. Library modules return their own error enums, which convert into it
/// with `?`.
///
/// ```
/// use playlist_digest::Res;
///
/// async fn load() -> Res<String> {
///     Ok("data".to_string())
/// }
/// ```
pub type Res<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Prints a progress or status line prefixed with a blue `o`.
///
/// Accepts the same arguments as `println!`.
///
/// ```
/// info!("Fetched {} playlist entries", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a completion line prefixed with a green check mark.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error line prefixed with a red `!` and exits with status 1.
///
/// Only the command layer uses this; library code returns errors. Guards
/// such as the run lock are not dropped when it fires, so release them
/// first.
///
/// ```
/// error!("Cannot load properties. Err: {}", e);
/// // not reached
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning prefixed with a yellow `!` for recoverable conditions,
/// such as an unavailable playlist or a failed property save.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
