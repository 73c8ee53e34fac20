mod common;

use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use common::{MockServer, entry, names};
use playlist_digest::{
    notify::{NotifyError, Notifier, added_yesterday, build_message},
    types::PlaylistEntry,
};
use reqwest::Client;
use serde_json::json;

fn reference() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 8, 0, 0).unwrap()
}

fn sample_entries() -> Vec<PlaylistEntry> {
    vec![
        entry("two-days", &["A"], "2024-05-08T12:00:00Z"),
        entry("first", &["B"], "2024-05-09T07:00:00Z"),
        entry("second", &["C", "D"], "2024-05-09T21:30:00Z"),
        entry("today", &["E"], "2024-05-10T01:00:00Z"),
    ]
}

fn owned(entries: Vec<&PlaylistEntry>) -> Vec<PlaylistEntry> {
    entries.into_iter().cloned().collect()
}

#[test]
fn test_only_previous_day_entries_in_order() {
    let entries = sample_entries();

    let added = added_yesterday(&reference(), &entries);

    assert_eq!(names(&owned(added)), vec!["first", "second"]);
}

#[test]
fn test_calendar_day_boundaries() {
    let entries = vec![
        entry("late", &["A"], "2024-05-09T23:59:59Z"),
        entry("early", &["A"], "2024-05-09T00:00:01Z"),
        entry("just-today", &["A"], "2024-05-10T00:00:01Z"),
        entry("just-before", &["A"], "2024-05-08T23:59:59Z"),
    ];

    // the time of day of the reference does not matter
    for hour in [0, 9, 23] {
        let reference = Utc.with_ymd_and_hms(2024, 5, 10, hour, 0, 30).unwrap();
        let added = added_yesterday(&reference, &entries);
        assert_eq!(names(&owned(added)), vec!["late", "early"]);
    }
}

#[test]
fn test_dates_are_compared_in_reference_time_zone() {
    let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
    let reference = tokyo.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).unwrap();
    let entries = vec![
        // 2024-05-09 01:30 in Tokyo
        entry("after-midnight", &["A"], "2024-05-08T16:30:00Z"),
        // 2024-05-10 00:30 in Tokyo
        entry("next-day", &["A"], "2024-05-09T15:30:00Z"),
    ];

    let added = added_yesterday(&reference, &entries);

    assert_eq!(names(&owned(added)), vec!["after-midnight"]);
}

#[test]
fn test_unparseable_or_missing_added_at_never_matches() {
    let mut undated = entry("undated", &["A"], "");
    undated.added_at = None;
    let entries = vec![entry("broken", &["A"], "yesterday"), undated];

    assert!(added_yesterday(&reference(), &entries).is_empty());
}

#[test]
fn test_build_message_format() {
    let entries = sample_entries();
    let selected = vec![&entries[1], &entries[2]];

    let message = build_message("Header", &selected).unwrap();

    assert_eq!(
        message,
        "Header\n\
         * <https://open.spotify.com/track/first|B/first>\n\
         * <https://open.spotify.com/track/second|C,D/second>\n"
    );
}

#[test]
fn test_build_message_empty() {
    assert!(build_message("Header", &[]).is_none());
}

#[tokio::test]
async fn test_notify_posts_yesterdays_tracks() {
    let server = MockServer::start().await;
    let notifier = Notifier::new(Client::new(), "Header".to_string());
    let entries = sample_entries();
    let webhook = server.webhook_url();

    let added = notifier
        .notify(Some(&webhook), &reference(), &entries)
        .await
        .unwrap();

    assert_eq!(added.len(), 2);
    let bodies = server.webhook_bodies();
    assert_eq!(bodies.len(), 1);
    assert_eq!(
        bodies[0],
        json!({
            "text": "Header\n* <https://open.spotify.com/track/first|B/first>\n* <https://open.spotify.com/track/second|C,D/second>\n",
            "mrkdwn": true
        })
    );
}

#[tokio::test]
async fn test_notify_without_matches_sends_nothing() {
    let server = MockServer::start().await;
    let notifier = Notifier::new(Client::new(), "Header".to_string());
    let entries = vec![
        entry("two-days", &["A"], "2024-05-08T12:00:00Z"),
        entry("today", &["E"], "2024-05-10T01:00:00Z"),
    ];
    let webhook = server.webhook_url();

    let added = notifier
        .notify(Some(&webhook), &reference(), &entries)
        .await
        .unwrap();

    assert!(added.is_empty());
    assert!(server.webhook_bodies().is_empty());
}

#[tokio::test]
async fn test_missing_webhook_only_matters_with_matches() {
    let notifier = Notifier::new(Client::new(), "Header".to_string());

    let nothing_to_send = notifier.notify(None, &reference(), &[]).await;
    assert!(matches!(nothing_to_send, Ok(ref added) if added.is_empty()));

    let entries = sample_entries();
    let result = notifier.notify(None, &reference(), &entries).await;
    assert!(matches!(result, Err(NotifyError::MissingWebhook)));
}
