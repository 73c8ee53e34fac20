#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    Json, Router,
    extract::{Form, Path, Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use playlist_digest::{management::Properties, types::PlaylistEntry};
use serde_json::{Value, json};

#[derive(Debug, Clone)]
pub struct TokenRequest {
    pub authorization: Option<String>,
    pub form: HashMap<String, String>,
}

/// Behaviour and recorded traffic of the mock Spotify API and webhook.
#[derive(Default)]
pub struct MockState {
    /// Items returned per page; page `n` is served at offset `n * 100`.
    pub pages: Mutex<Vec<Vec<Value>>>,
    /// Bearer token the playlist endpoint accepts.
    pub valid_token: Mutex<String>,
    /// Status returned by the playlist endpoint for every request.
    pub fail_status: Mutex<Option<u16>>,
    /// Offsets answered with 401 once each, in order of appearance.
    pub reject_offsets: Mutex<Vec<u32>>,
    /// Body of the token endpoint; its `access_token` becomes the valid token.
    pub token_response: Mutex<Value>,
    pub track_offsets: Mutex<Vec<u32>>,
    pub token_requests: Mutex<Vec<TokenRequest>>,
    pub webhook_bodies: Mutex<Vec<Value>>,
}

pub struct MockServer {
    pub url: String,
    pub state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .route("/v1/playlists/{id}/tracks", get(tracks))
            .route("/api/token", post(token))
            .route("/hook", post(webhook))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}", addr),
            state,
        }
    }

    pub fn api_url(&self) -> String {
        format!("{}/v1", self.url)
    }

    pub fn token_url(&self) -> String {
        format!("{}/api/token", self.url)
    }

    pub fn webhook_url(&self) -> String {
        format!("{}/hook", self.url)
    }

    pub fn set_pages(&self, pages: Vec<Vec<Value>>) {
        *self.state.pages.lock().unwrap() = pages;
    }

    pub fn set_valid_token(&self, token: &str) {
        *self.state.valid_token.lock().unwrap() = token.to_string();
    }

    pub fn set_token_response(&self, body: Value) {
        *self.state.token_response.lock().unwrap() = body;
    }

    pub fn set_fail_status(&self, status: u16) {
        *self.state.fail_status.lock().unwrap() = Some(status);
    }

    pub fn reject_once_at(&self, offsets: &[u32]) {
        *self.state.reject_offsets.lock().unwrap() = offsets.to_vec();
    }

    pub fn track_offsets(&self) -> Vec<u32> {
        self.state.track_offsets.lock().unwrap().clone()
    }

    pub fn token_requests(&self) -> Vec<TokenRequest> {
        self.state.token_requests.lock().unwrap().clone()
    }

    pub fn webhook_bodies(&self) -> Vec<Value> {
        self.state.webhook_bodies.lock().unwrap().clone()
    }
}

async fn tracks(
    State(state): State<Arc<MockState>>,
    Path(_id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    let offset: u32 = query
        .get("offset")
        .and_then(|o| o.parse().ok())
        .unwrap_or(0);
    state.track_offsets.lock().unwrap().push(offset);

    let fail_status = *state.fail_status.lock().unwrap();
    if let Some(code) = fail_status {
        return StatusCode::from_u16(code).unwrap().into_response();
    }

    {
        let mut reject = state.reject_offsets.lock().unwrap();
        if let Some(pos) = reject.iter().position(|o| *o == offset) {
            reject.remove(pos);
            return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"status": 401}})))
                .into_response();
        }
    }

    let expected = format!("Bearer {}", state.valid_token.lock().unwrap());
    let presented = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if presented != expected {
        return (StatusCode::UNAUTHORIZED, Json(json!({"error": {"status": 401}})))
            .into_response();
    }

    let pages = state.pages.lock().unwrap().clone();
    let index = (offset / 100) as usize;
    let items = pages.get(index).cloned().unwrap_or_default();
    let next = if index + 1 < pages.len() {
        json!(format!("https://api.example/next?offset={}", offset + 100))
    } else {
        Value::Null
    };

    Json(json!({ "items": items, "next": next })).into_response()
}

async fn token(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Response {
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state
        .token_requests
        .lock()
        .unwrap()
        .push(TokenRequest { authorization, form });

    let body = state.token_response.lock().unwrap().clone();
    if let Some(token) = body.get("access_token").and_then(Value::as_str) {
        *state.valid_token.lock().unwrap() = token.to_string();
    }
    Json(body).into_response()
}

async fn webhook(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> StatusCode {
    state.webhook_bodies.lock().unwrap().push(body);
    StatusCode::OK
}

/// JSON for one playlist entry as the API returns it.
pub fn entry_json(name: &str, artists: &[&str], added_at: &str) -> Value {
    json!({
        "added_at": added_at,
        "track": {
            "name": name,
            "artists": artists.iter().map(|a| json!({ "name": a })).collect::<Vec<_>>(),
            "external_urls": { "spotify": format!("https://open.spotify.com/track/{}", name) },
            "album": { "release_date": "2020-01-01" }
        }
    })
}

pub fn entry(name: &str, artists: &[&str], added_at: &str) -> PlaylistEntry {
    serde_json::from_value(entry_json(name, artists, added_at)).unwrap()
}

pub fn names(entries: &[PlaylistEntry]) -> Vec<String> {
    entries
        .iter()
        .map(|e| e.track.as_ref().map(|t| t.name.clone()).unwrap_or_default())
        .collect()
}

/// Properties with client credentials, a token pair and a playlist.
pub fn properties(access_token: &str) -> Properties {
    Properties {
        client_id: Some("client-id".to_string()),
        client_secret: Some("client-secret".to_string()),
        authorization_code: Some("code-1".to_string()),
        access_token: Some(access_token.to_string()),
        refresh_token: Some("refresh-1".to_string()),
        playlist_id: Some("playlist-1".to_string()),
        incoming_webhook: None,
    }
}
