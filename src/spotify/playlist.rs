use std::{fmt, time::Duration};

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::{Client, StatusCode};

use crate::{
    management::{Properties, Property},
    spotify::auth::{AuthError, TokenManager},
    types::{PlaylistEntry, PlaylistTracksPage},
};

/// Number of entries requested per page.
pub const PAGE_SIZE: u32 = 100;

#[derive(Debug)]
pub enum FetchError {
    Http(reqwest::Error),
    Auth(AuthError),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        FetchError::Http(err)
    }
}

impl From<AuthError> for FetchError {
    fn from(err: AuthError) -> Self {
        FetchError::Auth(err)
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "playlist request failed: {}", e),
            FetchError::Auth(e) => write!(f, "re-authentication failed: {}", e),
        }
    }
}

impl std::error::Error for FetchError {}

/// Outcome of reading a whole playlist.
#[derive(Debug)]
pub enum PlaylistFetch {
    /// Every page was read; entries are in playlist order.
    Complete(Vec<PlaylistEntry>),
    /// The API answered with a status other than 200 and the listing was
    /// abandoned.
    Unavailable(StatusCode),
}

pub struct PlaylistFetcher {
    client: Client,
    api_url: String,
    tokens: TokenManager,
}

impl PlaylistFetcher {
    pub fn new(client: Client, api_url: String, tokens: TokenManager) -> Self {
        Self {
            client,
            api_url,
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Reads all entries of `playlist_id`, page by page.
    ///
    /// Pages are requested sequentially until the API reports no `next`
    /// page. A 401 triggers one token refresh, after which the listing
    /// starts over from offset 0. Any other non-200 status, or a second 401,
    /// ends the fetch with [`PlaylistFetch::Unavailable`] without further
    /// requests.
    pub async fn fetch(
        &self,
        props: &mut Properties,
        playlist_id: &str,
    ) -> Result<PlaylistFetch, FetchError> {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_style(
            ProgressStyle::with_template("{spinner:.blue} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        );

        let result = self.fetch_pages(props, playlist_id, &pb).await;
        pb.finish_and_clear();
        result
    }

    async fn fetch_pages(
        &self,
        props: &mut Properties,
        playlist_id: &str,
        pb: &ProgressBar,
    ) -> Result<PlaylistFetch, FetchError> {
        let mut entries: Vec<PlaylistEntry> = Vec::new();
        let mut offset: u32 = 0;
        let mut refreshed = false;

        loop {
            pb.set_message(format!(
                "Fetching playlist entries {}-{}...",
                offset + 1,
                offset + PAGE_SIZE
            ));

            let token = props.get(Property::AccessToken).unwrap_or_default().to_string();
            let response = self
                .client
                .get(self.page_url(playlist_id, offset))
                .bearer_auth(token)
                .send()
                .await?;

            match response.status() {
                StatusCode::OK => {
                    let page = response.json::<PlaylistTracksPage>().await?;
                    entries.extend(page.items);

                    if page.next.is_none() {
                        return Ok(PlaylistFetch::Complete(entries));
                    }
                    offset += PAGE_SIZE;
                }
                StatusCode::UNAUTHORIZED if !refreshed => {
                    pb.set_message("Access token rejected, refreshing...");
                    self.tokens.refresh(props).await?;
                    refreshed = true;

                    // start over with the new token
                    entries.clear();
                    offset = 0;
                }
                status => return Ok(PlaylistFetch::Unavailable(status)),
            }
        }
    }

    fn page_url(&self, playlist_id: &str, offset: u32) -> String {
        format!(
            "{uri}/playlists/{id}/tracks?limit={limit}&offset={offset}",
            uri = self.api_url,
            id = playlist_id,
            limit = PAGE_SIZE,
            offset = offset
        )
    }
}
