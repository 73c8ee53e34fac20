//! The daily run: schedule, fetch, record, announce.

use std::fmt;

use chrono::{DateTime, TimeZone};
use reqwest::{Client, StatusCode};

use crate::{
    config::Settings,
    info,
    management::{Properties, Property, TriggerError, TriggerStore},
    notify::{self, NotifyError, Notifier},
    schedule::Scheduler,
    sheet::{Sheet, SheetError, SheetWriter},
    spotify::{
        auth::{AuthError, TokenManager},
        playlist::{FetchError, PlaylistFetch, PlaylistFetcher},
    },
    success,
    types::{NewTrackRow, Trigger},
    warning,
};

#[derive(Debug)]
pub enum JobError {
    Schedule(TriggerError),
    MissingProperty(Property),
    Auth(AuthError),
    Fetch(FetchError),
    Sheet(SheetError),
    Notify(NotifyError),
}

impl From<TriggerError> for JobError {
    fn from(err: TriggerError) -> Self {
        JobError::Schedule(err)
    }
}

impl From<AuthError> for JobError {
    fn from(err: AuthError) -> Self {
        JobError::Auth(err)
    }
}

impl From<FetchError> for JobError {
    fn from(err: FetchError) -> Self {
        JobError::Fetch(err)
    }
}

impl From<SheetError> for JobError {
    fn from(err: SheetError) -> Self {
        JobError::Sheet(err)
    }
}

impl From<NotifyError> for JobError {
    fn from(err: NotifyError) -> Self {
        JobError::Notify(err)
    }
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::Schedule(e) => write!(f, "scheduling the next run failed: {}", e),
            JobError::MissingProperty(p) => write!(f, "property {} is not set", p),
            JobError::Auth(e) => write!(f, "authentication failed: {}", e),
            JobError::Fetch(e) => write!(f, "{}", e),
            JobError::Sheet(e) => write!(f, "writing the sheet failed: {}", e),
            JobError::Notify(e) => write!(f, "notification failed: {}", e),
        }
    }
}

impl std::error::Error for JobError {}

#[derive(Debug)]
pub struct RunSummary {
    pub next_run: Trigger,
    pub outcome: RunOutcome,
}

#[derive(Debug)]
pub enum RunOutcome {
    Recorded {
        tracks: usize,
        announced: Vec<NewTrackRow>,
    },
    Skipped(StatusCode),
}

pub struct Job<S: Sheet> {
    scheduler: Scheduler,
    fetcher: PlaylistFetcher,
    writer: SheetWriter<S>,
    notifier: Notifier,
}

impl<S: Sheet> Job<S> {
    pub fn new(
        scheduler: Scheduler,
        fetcher: PlaylistFetcher,
        writer: SheetWriter<S>,
        notifier: Notifier,
    ) -> Self {
        Self {
            scheduler,
            fetcher,
            writer,
            notifier,
        }
    }

    /// Wires the components from `settings` around one shared HTTP client.
    pub fn from_settings(settings: &Settings, sheet: S) -> Self {
        let client = Client::new();
        let tokens = TokenManager::new(
            client.clone(),
            settings.token_url.clone(),
            settings.redirect_uri.clone(),
        );

        Self {
            scheduler: Scheduler::new(
                TriggerStore::new(settings.trigger_path.clone()),
                settings.schedule_hour,
            ),
            fetcher: PlaylistFetcher::new(client.clone(), settings.api_url.clone(), tokens),
            writer: SheetWriter::new(sheet),
            notifier: Notifier::new(client, settings.notify_header.clone()),
        }
    }

    pub fn writer(&self) -> &SheetWriter<S> {
        &self.writer
    }

    /// Runs the job once as of `now`.
    ///
    /// The next run is registered first; if that fails nothing else happens.
    /// When the playlist cannot be read the sheet and the webhook are left
    /// untouched.
    pub async fn run<Tz: TimeZone>(
        &mut self,
        props: &mut Properties,
        now: DateTime<Tz>,
    ) -> Result<RunSummary, JobError> {
        let next_run = self.scheduler.schedule_next(&now).await?;
        info!("Next run scheduled for {}", next_run.at);

        let playlist_id = props
            .get(Property::PlaylistId)
            .ok_or(JobError::MissingProperty(Property::PlaylistId))?
            .to_string();

        self.fetcher.tokens().exchange_code(props).await?;

        let entries = match self.fetcher.fetch(props, &playlist_id).await? {
            PlaylistFetch::Complete(entries) => entries,
            PlaylistFetch::Unavailable(status) => {
                warning!(
                    "Playlist {} is unavailable ({}), skipping sheet and notification",
                    playlist_id,
                    status
                );
                return Ok(RunSummary {
                    next_run,
                    outcome: RunOutcome::Skipped(status),
                });
            }
        };
        info!("Fetched {} playlist entries", entries.len());

        let tracks = self.writer.write(&entries).await?;
        success!("Sheet updated with {} tracks", tracks);

        let added = self
            .notifier
            .notify(props.get(Property::IncomingWebhook), &now, &entries)
            .await?;
        if added.is_empty() {
            info!("No tracks were added yesterday");
        } else {
            success!("Announced {} tracks added yesterday", added.len());
        }

        Ok(RunSummary {
            next_run,
            outcome: RunOutcome::Recorded {
                tracks,
                announced: notify::new_track_rows(&added),
            },
        })
    }
}
