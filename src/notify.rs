use std::fmt;

use chrono::{DateTime, TimeZone};
use reqwest::Client;

use crate::{
    types::{NewTrackRow, PlaylistEntry, WebhookMessage},
    utils,
};

#[derive(Debug)]
pub enum NotifyError {
    Http(reqwest::Error),
    MissingWebhook,
}

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Http(err)
    }
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::Http(e) => write!(f, "webhook request failed: {}", e),
            NotifyError::MissingWebhook => write!(f, "property incomingWebhook is not set"),
        }
    }
}

impl std::error::Error for NotifyError {}

/// Announces the tracks added to the playlist on the previous day.
pub struct Notifier {
    client: Client,
    header: String,
}

impl Notifier {
    pub fn new(client: Client, header: String) -> Self {
        Self { client, header }
    }

    /// Posts the entries added on the calendar day before `reference`.
    ///
    /// Nothing is sent when no entry qualifies; a missing webhook URL is only
    /// an error when there is something to send. Returns the announced
    /// entries in playlist order.
    pub async fn notify<'a, Tz: TimeZone>(
        &self,
        webhook: Option<&str>,
        reference: &DateTime<Tz>,
        entries: &'a [PlaylistEntry],
    ) -> Result<Vec<&'a PlaylistEntry>, NotifyError> {
        let added = added_yesterday(reference, entries);
        let Some(text) = build_message(&self.header, &added) else {
            return Ok(added);
        };

        let webhook = webhook
            .filter(|url| !url.is_empty())
            .ok_or(NotifyError::MissingWebhook)?;

        self.client
            .post(webhook)
            .json(&WebhookMessage { text, mrkdwn: true })
            .send()
            .await?
            .error_for_status()?;

        Ok(added)
    }
}

/// Entries whose `added_at` falls on the calendar day before `reference`,
/// both read in `reference`'s time zone. Order is preserved.
pub fn added_yesterday<'a, Tz: TimeZone>(
    reference: &DateTime<Tz>,
    entries: &'a [PlaylistEntry],
) -> Vec<&'a PlaylistEntry> {
    let Some(yesterday) = reference.date_naive().pred_opt() else {
        return Vec::new();
    };
    let tz = reference.timezone();

    entries
        .iter()
        .filter(|e| {
            e.added_at
                .as_deref()
                .and_then(|added_at| utils::added_on(added_at, &tz))
                == Some(yesterday)
        })
        .collect()
}

/// Header line followed by one `* <url|artists/name>` line per entry, or
/// `None` when there is nothing to announce.
pub fn build_message(header: &str, entries: &[&PlaylistEntry]) -> Option<String> {
    if entries.is_empty() {
        return None;
    }

    let mut message = format!("{}\n", header);
    for entry in entries {
        message.push_str(&format!(
            "* <{}|{}/{}>\n",
            utils::entry_url(entry).unwrap_or_default(),
            utils::entry_artists(entry),
            utils::entry_name(entry)
        ));
    }
    Some(message)
}

pub fn new_track_rows(entries: &[&PlaylistEntry]) -> Vec<NewTrackRow> {
    entries
        .iter()
        .map(|e| NewTrackRow {
            added_at: e.added_at.clone().unwrap_or_default(),
            artists: utils::entry_artists(e),
            name: utils::entry_name(e),
        })
        .collect()
}
